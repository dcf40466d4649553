use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("variable '{0}' is not bound")]
    UnboundVariable(String),

    #[error("'{0}' is not implemented")]
    Unsupported(&'static str),

    #[error("definition of '{0}' recurses too deeply")]
    CyclicDefinition(String),
}
