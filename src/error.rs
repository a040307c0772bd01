use std::error::Error;
use std::fmt;

/// Custom Error and Result types to unify errors from all sources.
pub type BotResult<T> = Result<T, BotError>;

#[derive(Debug, PartialEq, Eq)]
pub enum BotError {
    InvalidTimeFormat(String),
    EmptyGameTitle,
    NotFound,
    StorageUnreadable(String),
    StorageUnwritable(String),
    Slack(String),
    Config(String),
}

impl fmt::Display for BotError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BotError::InvalidTimeFormat(s) => write!(f, "Invalid time format: '{}'", s),
            BotError::EmptyGameTitle => write!(f, "Game title can't be blank"),
            BotError::NotFound => write!(f, "No matching run found"),
            BotError::StorageUnreadable(s) => write!(f, "Storage read Error: {}", s),
            BotError::StorageUnwritable(s) => write!(f, "Storage write Error: {}", s),
            BotError::Slack(s) => write!(f, "Slack Error: {}", s),
            BotError::Config(s) => write!(f, "Configuration Error: {}", s),
        }
    }
}

impl Error for BotError {}

impl From<figment::Error> for BotError {
    fn from(error: figment::Error) -> Self {
        BotError::Config(error.to_string())
    }
}

impl From<slack_morphism::errors::SlackClientError> for BotError {
    fn from(error: slack_morphism::errors::SlackClientError) -> Self {
        BotError::Slack(error.to_string())
    }
}
