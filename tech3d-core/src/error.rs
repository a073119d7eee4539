/// Errors raised when turning user-facing control values into core types
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid hex color '{0}', expected #rrggbb")]
    InvalidHex(String),

    #[error("unknown color mode '{0}', expected per-letter, single or rainbow")]
    UnknownColorMode(String),

    #[error("unknown letter '{0}', expected one of T, E, C, H")]
    UnknownLetter(String),

    #[error("unknown animation path '{0}', expected 1 (forward), 2 (reverse) or 3 (manual)")]
    UnknownPath(String),

    #[error("unknown rotation axis '{0}', expected x, y or z")]
    UnknownAxis(String),
}
