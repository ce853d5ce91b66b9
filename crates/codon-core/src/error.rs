//! Error types for genome lexing, mutation and I/O.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Genome length {length} is not divisible by 3")]
    FrameLength { length: usize },

    #[error("Invalid character '{character}' at offset {offset}")]
    InvalidCharacter { character: char, offset: usize },

    #[error("No eligible position for {kind} mutation: {reason}")]
    NoEligiblePosition { kind: String, reason: String },

    #[error("Position {position} out of range (0..{limit})")]
    PositionOutOfRange { position: usize, limit: usize },

    #[error("Invalid count: {0}")]
    InvalidCount(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl Error {
    pub fn no_eligible(kind: &str, reason: impl Into<String>) -> Self {
        Error::NoEligiblePosition {
            kind: kind.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_length_message() {
        let err = Error::FrameLength { length: 5 };
        assert!(err.to_string().contains("not divisible by 3"));
    }

    #[test]
    fn test_invalid_character_message() {
        let err = Error::InvalidCharacter {
            character: 'X',
            offset: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("'X'"));
        assert!(msg.contains("offset 4"));
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
