// Handler error type
// Anything that stops a handler from producing its normal body ends up here
// and is reported as INTERNAL_ERROR with the message below.

use std::fmt;

use crate::env::EnvError;

#[derive(Debug)]
pub enum HandlerError {
    Env(EnvError),
    Serialize(serde_json::Error),
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env(e) => write!(f, "{e}"),
            Self::Serialize(e) => write!(f, "failed to serialize response: {e}"),
        }
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Env(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<EnvError> for HandlerError {
    fn from(e: EnvError) -> Self {
        Self::Env(e)
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e)
    }
}
