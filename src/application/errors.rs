//! Application layer errors

use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Language error: {0}")]
    Language(#[from] LanguageError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command not found: {0}")]
    NotFound(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Language engine errors
#[derive(Error, Debug)]
pub enum LanguageError {
    #[error("Invalid pattern: {0}")]
    Pattern(String),

    #[error("Reply generation failed: {0}")]
    Reply(String),

    #[error("Timed out after {0}s")]
    Timeout(u64),
}

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lock poisoned: {0}")]
    Poisoned(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Reply literal parse errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplyParseError {
    #[error("Unterminated string literal")]
    UnterminatedString,

    #[error("Unexpected token '{0}' in reply literal")]
    UnexpectedToken(char),

    #[error("Mapping must have exactly one key, found {0}")]
    MappingArity(usize),

    #[error("Unsupported reply shape: {0}")]
    Shape(String),
}
