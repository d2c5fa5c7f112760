//! Bind declared call signatures straight to command-line arguments
//!
//! A [Signature] (or the [signature] macro) declares a callable's parameter
//! list once; decoding `argv` against the resulting [Schema] assembles the
//! ready-to-invoke argument list and hands it to an [Invocable]:
//!
//! ```
//! use argbind::{signature, Cli, Slot};
//!
//! let schema = signature!(name, { shout = false }).unwrap();
//! let cli = Cli::single(schema, |args: &[Slot]| {
//!     // args[0] is the name token, args[1] the options bag
//!     println!("{:?}", args);
//! });
//! cli.launch_custom(["world", "--shout"], &mut std::io::sink()).unwrap();
//! ```
//!
//! Multi-command CLIs register a table of named schemas with
//! [Cli::commands]; the first positional token selects the command and the
//! rest of the input is decoded against that command's own schema.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decode;
mod error;
mod schema;
mod usage;

pub use decode::{decode, Decoded, Slot, Value};
pub use error::{Error, Result};
pub use schema::{CommandEntry, Opt, Positional, Schema, Signature};
pub use usage::usage;

use std::env;
use std::io::{self, Write};

use tracing::error;

/// A bound callable: the closed invocation surface of the dispatcher
///
/// Implemented for free by any `Fn(&[Slot])` closure or function pointer.
pub trait Invocable {
    /// Invokes the callable with the assembled argument slots
    fn invoke(&self, args: &[Slot]);
}

impl<F> Invocable for F
where
    F: Fn(&[Slot]),
{
    fn invoke(&self, args: &[Slot]) {
        self(args)
    }
}

enum Targets {
    Single(Box<dyn Invocable>),
    Commands(Vec<(String, Box<dyn Invocable>)>),
}

/// A schema paired with the callable(s) it dispatches to
pub struct Cli {
    schema: Schema,
    targets: Targets,
}

impl Cli {
    /// Binds one callable to its schema
    pub fn single(schema: Schema, target: impl Invocable + 'static) -> Self {
        Self {
            schema,
            targets: Targets::Single(Box::new(target)),
        }
    }

    /// Binds a table of named callables, each with its own schema
    ///
    /// The synthesized outer schema takes a single mandatory `command`
    /// positional; the selected entry's schema governs the remaining tokens.
    /// Targets are boxed because each command usually binds a distinct
    /// closure type.
    pub fn commands<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Schema, Box<dyn Invocable>)>,
        S: Into<String>,
    {
        let mut table = Vec::new();
        let mut targets: Vec<(String, Box<dyn Invocable>)> = Vec::new();
        for (name, schema, target) in entries {
            let name = name.into();
            table.push(CommandEntry {
                name: name.clone(),
                schema,
            });
            targets.push((name, target));
        }
        Self {
            schema: Schema::command_set(table),
            targets: Targets::Commands(targets),
        }
    }

    /// The schema this binding decodes against
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Decodes the process argument vector and dispatches
    ///
    /// Diagnostics go to stderr, fire-and-forget; decode errors never
    /// propagate out of this call.
    pub fn launch(&self) {
        let stderr = io::stderr();
        let mut lock = stderr.lock();
        let _ = self.launch_custom(env::args().skip(1), &mut lock);
    }

    /// Decodes the given tokens and dispatches, writing diagnostics to `diag`
    pub fn launch_custom<I, S>(&self, tokens: I, diag: &mut impl Write) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let decoded = decode(&self.schema, tokens);
        self.dispatch(&decoded, diag)
    }

    /// Acts on one decoded result: report the error, or invoke the target
    fn dispatch(&self, decoded: &Decoded, diag: &mut impl Write) -> io::Result<()> {
        if let Some(err) = &decoded.error {
            return write!(diag, "error: {}\n\n{}", err, usage(decoded.schema));
        }

        let target = match &self.targets {
            Targets::Single(target) => Some(target.as_ref()),
            Targets::Commands(table) => decoded.command.and_then(|command| {
                table
                    .iter()
                    .find(|(name, _)| *name == command.name)
                    .map(|(_, target)| target.as_ref())
            }),
        };
        match target {
            Some(target) => target.invoke(&decoded.apply),
            // an error-free decode always resolves a target; reaching this
            // arm is a caller contract violation
            None => error!("no target resolved for decoded input"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;
    use std::str;

    #[test]
    fn single_binding_invokes_with_assembled_slots() {
        let seen: Rc<RefCell<Vec<Slot>>> = Rc::default();
        let sink = seen.clone();
        let cli = Cli::single(
            signature!(name, { shout = false }).unwrap(),
            move |args: &[Slot]| sink.borrow_mut().extend_from_slice(args),
        );

        let mut diag = Vec::new();
        cli.launch_custom(["world", "--shout"], &mut diag).unwrap();

        assert!(diag.is_empty());
        let bag = BTreeMap::from([("shout".to_string(), Value::Switch(true))]);
        assert_eq!(
            *seen.borrow(),
            vec![Slot::Text("world".to_string()), Slot::Options(bag)]
        );
    }

    #[test]
    fn error_path_writes_message_and_usage_without_invoking() {
        let seen: Rc<RefCell<Vec<Slot>>> = Rc::default();
        let sink = seen.clone();
        let cli = Cli::single(
            signature!(name, { shout = false }).unwrap(),
            move |args: &[Slot]| sink.borrow_mut().extend_from_slice(args),
        );

        let mut diag = Vec::new();
        cli.launch_custom(Vec::<String>::new(), &mut diag).unwrap();

        assert!(seen.borrow().is_empty());
        assert_eq!(
            str::from_utf8(&diag).unwrap(),
            "error: Missing required argument\n\nusage: [options] name\n\noptions:\n  --shout\n"
        );
    }

    #[test]
    fn command_binding_dispatches_to_the_selected_target() {
        let calls: Rc<RefCell<Vec<(String, usize)>>> = Rc::default();
        let build_calls = calls.clone();
        let test_calls = calls.clone();
        let cli = Cli::commands([
            (
                "build",
                signature!(target).unwrap(),
                Box::new(move |args: &[Slot]| {
                    build_calls.borrow_mut().push(("build".to_string(), args.len()))
                }) as Box<dyn Invocable>,
            ),
            (
                "test",
                signature!(target, { verbose = false }).unwrap(),
                Box::new(move |args: &[Slot]| {
                    test_calls.borrow_mut().push(("test".to_string(), args.len()))
                }) as Box<dyn Invocable>,
            ),
        ]);

        let mut diag = Vec::new();
        cli.launch_custom(["test", "x"], &mut diag).unwrap();

        assert!(diag.is_empty());
        // selector excluded from apply; slots are the target plus the bag
        assert_eq!(*calls.borrow(), vec![("test".to_string(), 2)]);
    }

    #[test]
    fn unknown_command_reports_against_the_outer_schema() {
        let cli = Cli::commands([(
            "build",
            signature!(target).unwrap(),
            Box::new(|_: &[Slot]| panic!("must not be invoked")) as Box<dyn Invocable>,
        )]);

        let mut diag = Vec::new();
        cli.launch_custom(["bogus"], &mut diag).unwrap();

        assert_eq!(
            str::from_utf8(&diag).unwrap(),
            "error: Missing required argument\n\nusage: command\n\ncommands:\n  build\n"
        );
    }
}
