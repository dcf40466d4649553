use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("parse error: {0}")]
    Syntax(String),
    #[error("unconsumed input: {0}")]
    UnconsumedInput(String),
}
