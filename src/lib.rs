//! Fill crossword grids by treating each word slot as a variable in a constraint satisfaction
//! problem.
//!
//! The pipeline is: build a [`Crossword`] from an open/blocked grid and a word list, filter each
//! variable's domain down to words of the right length, make the whole grid arc-consistent with
//! AC-3, and then complete the assignment with a backtracking search ordered by the
//! minimum-remaining-values, degree, and least-constraining-value heuristics.
//!
//! ```
//! use crossword_fill::{solve, Crossword, SolverConfig};
//!
//! let crossword = Crossword::from_template(
//!     "
//!     ___
//!     #_#
//!     #_#
//!     ",
//!     ["cat", "car", "art"],
//! );
//!
//! let result = solve(&crossword, &SolverConfig::default()).expect("puzzle has a fill");
//! assert!(result.assignment.is_complete());
//! ```

pub mod arc_consistency;
pub mod assignment;
pub mod domains;
pub mod error;
pub mod loader;
pub mod render;
pub mod search;
pub mod structure;
pub mod variable;

pub use arc_consistency::{
    enforce_arc_consistency, is_arc_consistent, revise, ArcConsistencyFailure,
    ArcConsistencyResult, ArcConsistencySuccess,
};
pub use assignment::Assignment;
pub use domains::{Checkpoint, DomainStore};
pub use error::LoadError;
pub use loader::{load_crossword, parse_structure, parse_words};
pub use render::{letter_grid, render_grid};
pub use search::{solve, FillFailure, FillSuccess, Solver, SolverConfig, Statistics};
pub use structure::{Crossing, Crossword, Overlap, Word};
pub use variable::{Direction, Variable};

/// The expected maximum length for a single slot. Longer words still work, they just spill onto
/// the heap.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a variable, based on its index in the crossword's `variables` field.
pub type VariableId = usize;

/// An identifier for a word, based on its index in the crossword's `words` field.
pub type WordId = usize;

/// Zero-indexed (row, col) coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);
