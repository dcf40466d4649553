use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("'{target}' does not occur in the expression")]
    NoOccurrence { target: String },

    #[error("'{target}' occurs {count} times; only a single occurrence can be isolated")]
    MultipleOccurrences { target: String, count: usize },

    #[error("cannot isolate '{target}': {reason}")]
    Unsolvable { target: String, reason: String },

    #[error("'{0}' has no implemented inverse")]
    Unsupported(&'static str),
}
