pub mod arc_consistency;
pub mod backtracking_search;
pub mod domains;
pub mod errors;
pub mod grid_config;
pub mod log;
pub mod render;
pub mod word_list;

pub use backtracking_search::{find_fill, find_fill_with_timeout, Assignment, FillFailure, FillSuccess, Statistics};
pub use errors::GridError;
pub use grid_config::{Direction, GridConfig, Overlap, Variable};
pub use render::render_grid;
pub use word_list::WordList;

/// The expected maximum number of slots appearing in a grid.
pub const MAX_SLOT_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given variable, based on its index in the GridConfig's `variables` field.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the WordList's `words` field.
pub type WordId = usize;

/// Zero-indexed (row, column) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);
