//! Errors raised while building a grid or vocabulary from input.

use std::io;

use crate::grid_config::Variable;

#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Structure is empty")]
    EmptyStructure,

    #[error("Variable {0} appears more than once")]
    DuplicateVariable(Variable),

    #[error("Variable has zero length at ({row}, {col})")]
    ZeroLengthVariable { row: usize, col: usize },

    #[error("Variables {0} and {1} share more than one cell")]
    MultipleSharedCells(Variable, Variable),
}

impl GridError {
    pub(crate) fn io(path: &str, source: io::Error) -> GridError {
        GridError::Io { path: path.to_string(), source }
    }
}
