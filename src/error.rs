//! Constructs for reporting errors within this library

use thiserror::Error;

/// Crate-specific result type for ease-of-use
pub type Result<T> = std::result::Result<T, Error>;

/// Represents schema-construction and decode errors
///
/// Decode errors never abort a walk; the decoder records the most recent one
/// into [`Decoded::error`](crate::Decoded) and keeps scanning.
/// [`Error::DuplicateOptions`] is the exception: it is raised while building a
/// [`Signature`](crate::Signature) and aborts construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An option token named no declared option
    #[error("Unknown option")]
    UnknownOption,
    /// A value-taking option reached the end of input without its value
    #[error("Option missing value")]
    OptionMissingValue,
    /// A boolean flag was given an inline `=value`
    #[error("Didn't expect value for flag argument")]
    UnexpectedFlagValue,
    /// More positional tokens arrived than the signature declares
    #[error("Too many arguments")]
    TooManyArguments,
    /// The command-selector token named no registered command
    #[error("Command not found")]
    CommandNotFound,
    /// Input ended with a required positional still unfilled
    #[error("Missing required argument")]
    MissingRequiredArgument,
    /// A signature declared more than one options group
    #[error("Can't nest/repeat options")]
    DuplicateOptions,
}
