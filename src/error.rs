// src/error.rs
//! Error types for the game

use std::fmt;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug)]
pub enum GameError {
    Io(std::io::Error),
    Serial(tokio_serial::Error),
    Json(serde_json::Error),
    Connection(String),
    Parse(String),
    Config(String),
    Storage(String),
    Other(String),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Io(e) => write!(f, "IO error: {}", e),
            GameError::Serial(e) => write!(f, "Serial error: {}", e),
            GameError::Json(e) => write!(f, "JSON error: {}", e),
            GameError::Connection(msg) => write!(f, "Connection error: {}", msg),
            GameError::Parse(msg) => write!(f, "Parse error: {}", msg),
            GameError::Config(msg) => write!(f, "Config error: {}", msg),
            GameError::Storage(msg) => write!(f, "Storage error: {}", msg),
            GameError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            GameError::Serial(e) => Some(e),
            GameError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(error: std::io::Error) -> Self {
        GameError::Io(error)
    }
}

impl From<tokio_serial::Error> for GameError {
    fn from(error: tokio_serial::Error) -> Self {
        GameError::Serial(error)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(error: serde_json::Error) -> Self {
        GameError::Json(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        let err = GameError::Config("tile size must be positive".to_string());
        assert_eq!(err.to_string(), "Config error: tile size must be positive");

        let err = GameError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[test]
    fn test_json_conversion_keeps_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GameError = json_err.into();
        assert!(matches!(err, GameError::Json(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
