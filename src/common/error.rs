use thiserror::Error;


#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Polyline decoding failure
pub enum DecodeError {
    #[error("polyline ends inside a coordinate sequence at byte {offset}")]
    Truncated { offset: usize },

    #[error("invalid polyline character {found:?} at byte {offset}")]
    InvalidCharacter { offset: usize, found: char },

    #[error("polyline coordinate sequence at byte {offset} is too long")]
    Overflow { offset: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Route normalization failure
pub enum RouteError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("activity stream contains no points")]
    EmptyStream,
}
