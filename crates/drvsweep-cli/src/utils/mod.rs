//! Terminal input helpers.

pub mod input;
pub mod selection;

pub use selection::{UNUSED_KEYWORD, parse_selection};
