//! Renders human-readable usage text from a schema

use crate::Schema;

/// Renders a plain-text usage block for a schema
///
/// One `usage:` line, then an `options:` section when options exist and a
/// `commands:` section when a command table exists. Human-oriented text, not
/// a serialization format; re-parsing it is not expected to be lossless.
pub fn usage(schema: &Schema) -> String {
    let mut text = String::from("usage:");

    if !schema.options.is_empty() {
        text.push_str(" [options]");
    }
    for positional in &schema.positional {
        if positional.required {
            text.push_str(&format!(" {}", positional.name));
        } else {
            text.push_str(&format!(" [{}]", positional.name));
        }
    }
    text.push('\n');

    if !schema.options.is_empty() {
        text.push_str("\noptions:\n");
        for opt in &schema.options {
            if opt.takes_value {
                text.push_str(&format!("  --{}=<value>\n", opt.name));
            } else {
                text.push_str(&format!("  --{}\n", opt.name));
            }
        }
    }

    if let Some(commands) = &schema.commands {
        text.push_str("\ncommands:\n");
        for command in commands {
            text.push_str(&format!("  {}\n", command.name));
        }
    }

    text
}
