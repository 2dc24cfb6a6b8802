//! Translate module - Folds a provider's flat detailed diff into a diff tree.

mod detailed_diff;
mod kind;
mod step;


pub use detailed_diff::*;
pub use kind::*;
pub use step::*;
