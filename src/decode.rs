//! Walks token sequences against a schema

use std::collections::BTreeMap;

use tracing::debug;

use crate::{CommandEntry, Error, Schema};

/// One decoded argument value: option text or a boolean switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Text taken from a token
    Text(String),
    /// Boolean recorded for a flag
    Switch(bool),
}

/// One slot of the ready-to-invoke argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// A positional token
    Text(String),
    /// A boolean argument
    Switch(bool),
    /// The options bag, spliced in at the signature's options position
    Options(BTreeMap<String, Value>),
    /// Placeholder for an optional positional the input never supplied
    Omitted,
}

/// The outcome of matching a token sequence against a schema
///
/// Produced fresh by every [decode] call; decoding the same schema and tokens
/// twice yields structurally equal results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    /// Schema active when the walk terminated (the selected command's schema
    /// in sub-command mode)
    pub schema: &'a Schema,
    /// Every positional and option value, merged, keyed by name
    pub values: BTreeMap<String, Value>,
    /// Option values only
    pub option_values: BTreeMap<String, Value>,
    /// The selected sub-command, if any
    pub command: Option<&'a CommandEntry>,
    /// Ready-to-invoke argument list
    pub apply: Vec<Slot>,
    /// Most recently recorded decode error; the walk never halts, so a later
    /// condition overwrites an earlier one
    pub error: Option<Error>,
}

impl<'a> Decoded<'a> {
    fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
            option_values: BTreeMap::new(),
            command: None,
            apply: Vec::new(),
            error: None,
        }
    }

    fn record_error(&mut self, error: Error) {
        debug!(%error, "recording decode error");
        self.error = Some(error);
    }
}

/// Splits a token matching the long-option grammar into name and inline value
///
/// The grammar is `--` followed by one or more word characters, optionally
/// `=` and an arbitrary value; only the first `=` splits. Tokens that miss
/// the grammar (including dashed names like `--dry-run`) are positional.
fn split_long_option(token: &str) -> Option<(&str, Option<&str>)> {
    let rest = token.strip_prefix("--")?;
    let (name, value) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((name, value))
}

/// Decodes an ordered token sequence against a schema
///
/// Errors never abort the walk; the last one encountered is left in
/// [Decoded::error] and the rest of the result reflects a best-effort parse.
pub fn decode<'a, I, S>(schema: &'a Schema, tokens: I) -> Decoded<'a>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
    debug!(count = tokens.len(), "decoding tokens");
    let mut decoded = walk(schema, &tokens);

    // the options bag is spliced once, against the schema the walk ended on,
    // so positionals on either side keep their call positions
    if let Some(index) = decoded.schema.options_index {
        let bag = Slot::Options(decoded.option_values.clone());
        decoded.apply.insert(index.min(decoded.apply.len()), bag);
    }
    decoded
}

fn walk<'a>(schema: &'a Schema, tokens: &[String]) -> Decoded<'a> {
    let mut decoded = Decoded::new(schema);
    let mut consumed = 0;

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        if let Some((name, inline)) = split_long_option(token) {
            decode_option(schema, name, inline, tokens, &mut index, &mut decoded);
        } else if let Some(command) = schema.find_command(token) {
            debug!(command = %command.name, "switching to command schema");
            let inner = walk(&command.schema, &tokens[index + 1..]);
            return merge(decoded, command, inner);
        } else if schema.commands.is_some() {
            // selector token named no command; the command slot stays open
            decoded.record_error(Error::CommandNotFound);
        } else if consumed < schema.positional.len() {
            let positional = &schema.positional[consumed];
            consumed += 1;
            decoded.apply.push(Slot::Text(token.clone()));
            decoded
                .values
                .insert(positional.name.clone(), Value::Text(token.clone()));
        } else {
            decoded.record_error(Error::TooManyArguments);
        }
        index += 1;
    }

    // end-of-input reconciliation over the positionals still open
    for positional in &schema.positional[consumed..] {
        if positional.required {
            decoded.record_error(Error::MissingRequiredArgument);
        } else {
            decoded.apply.push(Slot::Omitted);
        }
    }
    decoded
}

fn decode_option<'a>(
    schema: &Schema,
    name: &str,
    inline: Option<&str>,
    tokens: &[String],
    index: &mut usize,
    decoded: &mut Decoded<'a>,
) {
    let resolved = match schema.find_option(name) {
        None => {
            decoded.record_error(Error::UnknownOption);
            // degraded continuation: record what was parsed anyway
            Some(match inline {
                Some(value) => Value::Text(value.to_string()),
                None => Value::Switch(true),
            })
        }
        Some(opt) if opt.takes_value => match inline {
            Some(value) => Some(Value::Text(value.to_string())),
            None => match tokens.get(*index + 1) {
                Some(next) => {
                    *index += 1;
                    Some(Value::Text(next.clone()))
                }
                None => {
                    decoded.record_error(Error::OptionMissingValue);
                    None
                }
            },
        },
        Some(_) => match inline {
            Some(value) => {
                decoded.record_error(Error::UnexpectedFlagValue);
                Some(Value::Text(value.to_string()))
            }
            None => Some(Value::Switch(true)),
        },
    };

    if let Some(value) = resolved {
        decoded.option_values.insert(name.to_string(), value.clone());
        decoded.values.insert(name.to_string(), value);
    }
}

/// Folds an inner (command-schema) decode back into the outer result
fn merge<'a>(
    mut outer: Decoded<'a>,
    command: &'a CommandEntry,
    inner: Decoded<'a>,
) -> Decoded<'a> {
    outer.schema = inner.schema;
    outer.command = Some(command);
    outer.values.extend(inner.values);
    outer.option_values.extend(inner.option_values);
    outer.apply = inner.apply;
    if inner.error.is_some() {
        outer.error = inner.error;
    }
    outer
}
