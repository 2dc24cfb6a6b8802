//! Resource module - Property trees and the diff trees built over them.

mod diff;
mod property;

pub use diff::*;
pub use property::*;
