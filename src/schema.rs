//! Declarative signatures and the schemas synthesized from them

use crate::{Error, Result};

/// One positional parameter of a bound callable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Positional {
    /// Parameter name, used for usage text and the decoded value map
    pub name: String,
    /// True unless the parameter declared a default
    pub required: bool,
}

/// One entry of a signature's options group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opt {
    /// Option name, matched against `--name` tokens
    pub name: String,
    /// True for value-taking options, false for boolean flags
    pub takes_value: bool,
}

impl Opt {
    /// Declares a boolean flag, the `name = false` convention
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            takes_value: false,
        }
    }

    /// Declares a value-taking option
    pub fn value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            takes_value: true,
        }
    }
}

/// A registered sub-command: its selector name and its own schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    /// Selector token that picks this command
    pub name: String,
    /// Schema the decoder switches to once selected
    pub schema: Schema,
}

/// The synthesized, immutable description of a callable's expected CLI inputs
///
/// Built once per callable (or per command table) and never mutated; decoding
/// borrows a schema, so one schema may back any number of decode calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Call-argument position where the options bag is injected, if the
    /// signature declared an options group
    pub options_index: Option<usize>,
    /// Declared options, kept in declaration order for rendering; lookup is
    /// by name
    pub options: Vec<Opt>,
    /// Positional parameters in declaration order
    pub positional: Vec<Positional>,
    /// Command table, present only for multi-command schemas
    pub commands: Option<Vec<CommandEntry>>,
}

impl Schema {
    /// Wraps a command table into a schema with a single mandatory `command`
    /// positional and no options of its own
    pub fn command_set<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = CommandEntry>,
    {
        Self {
            options_index: None,
            options: vec![],
            positional: vec![Positional {
                name: "command".to_string(),
                required: true,
            }],
            commands: Some(entries.into_iter().collect()),
        }
    }

    /// Looks up a declared option by name
    pub(crate) fn find_option(&self, name: &str) -> Option<&Opt> {
        self.options.iter().find(|opt| opt.name == name)
    }

    /// Looks up a registered command by selector name
    pub(crate) fn find_command(&self, name: &str) -> Option<&CommandEntry> {
        self.commands
            .as_deref()
            .and_then(|cmds| cmds.iter().find(|cmd| cmd.name == name))
    }
}

/// Builder for one callable's [Schema]
///
/// The declaration order of `required`/`optional`/`options` calls mirrors the
/// bound callable's parameter list left to right; the [crate::signature]
/// macro expands to exactly these calls.
#[derive(Debug, Default)]
pub struct Signature {
    positional: Vec<Positional>,
    options: Vec<Opt>,
    options_index: Option<usize>,
    options_groups: usize,
}

impl Signature {
    /// Starts an empty signature
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a required positional parameter
    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.positional.push(Positional {
            name: name.into(),
            required: true,
        });
        self
    }

    /// Appends an optional positional parameter
    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.positional.push(Positional {
            name: name.into(),
            required: false,
        });
        self
    }

    /// Declares the options group at the current parameter position
    ///
    /// A signature holds at most one group; declaring a second makes
    /// [Signature::build] fail.
    pub fn options<I>(mut self, opts: I) -> Self
    where
        I: IntoIterator<Item = Opt>,
    {
        self.options_groups += 1;
        if self.options_index.is_none() {
            self.options_index = Some(self.positional.len());
        }
        self.options.extend(opts);
        self
    }

    /// Finalizes the schema, rejecting repeated options groups
    pub fn build(self) -> Result<Schema> {
        if self.options_groups > 1 {
            return Err(Error::DuplicateOptions);
        }
        Ok(Schema {
            options_index: self.options_index,
            options: self.options,
            positional: self.positional,
            commands: None,
        })
    }
}

/// Declares a callable's signature and builds its [Schema]
///
/// Entries are comma-separated, left to right as in the parameter list:
/// a bare name is a required positional, `[name]` an optional positional, and
/// a single `{ .. }` group declares the options, where `name = false` is a
/// boolean flag and a bare name a value-taking option:
///
/// ```
/// use argbind::signature;
///
/// let schema = signature!(src, { verbose = false, out }, [dest]).unwrap();
/// assert_eq!(schema.options_index, Some(1));
/// ```
#[macro_export]
macro_rules! signature {
    () => { $crate::Signature::new().build() };
    ($($tail:tt)*) => {{
        #[allow(unused_mut)]
        let mut sig = $crate::Signature::new();
        $crate::signature_below!(sig; $($tail)*);
        sig.build()
    }};
}

#[doc(hidden)] // rust workaround, #61265 (see https://github.com/rust-lang/rust/issues/61265)
#[macro_export]
macro_rules! signature_below {
    // empty (end of parsing)
    ($($sig:ident;)? $(,)?) => {};
    // options group
    ($sig:ident; $(,)? { $($inner:tt)* } $($tail:tt)*) => {
        {
            #[allow(unused_mut)]
            let mut opts: ::std::vec::Vec<$crate::Opt> = ::std::vec::Vec::new();
            $crate::options_below!(opts; $($inner)*);
            $sig = $sig.options(opts);
            $crate::signature_below!($sig; $($tail)*);
        }
    };
    // optional positional
    ($sig:ident; $(,)? [$name:ident] $($tail:tt)*) => {
        {
            $sig = $sig.optional(stringify!($name));
            $crate::signature_below!($sig; $($tail)*);
        }
    };
    // required positional
    ($sig:ident; $(,)? $name:ident $($tail:tt)*) => {
        {
            $sig = $sig.required(stringify!($name));
            $crate::signature_below!($sig; $($tail)*);
        }
    };
}

#[doc(hidden)] // rust workaround, #61265 (see https://github.com/rust-lang/rust/issues/61265)
#[macro_export]
macro_rules! options_below {
    // end of parsing
    ($($opts:ident;)? $(,)?) => {};
    // `= false` marks a boolean flag
    ($opts:ident; $(,)? $name:ident = false $($tail:tt)*) => {
        {
            $opts.push($crate::Opt::flag(stringify!($name)));
            $crate::options_below!($opts; $($tail)*);
        }
    };
    // bare names take a value
    ($opts:ident; $(,)? $name:ident $($tail:tt)*) => {
        {
            $opts.push($crate::Opt::value(stringify!($name)));
            $crate::options_below!($opts; $($tail)*);
        }
    };
}
