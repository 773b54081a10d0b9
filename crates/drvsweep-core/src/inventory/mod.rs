//! Driver inventory parsing.
//!
//! Pure functions only: no I/O, no process invocation. Everything here can
//! be exercised against recorded listings.

mod parser;

pub use parser::parse_driver_listing;
