//! Diff path module - Property paths naming the leaves of a detailed diff.

mod parse;
mod path;

pub use parse::*;
pub use path::*;
