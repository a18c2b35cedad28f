//! Utility functions and helpers.

pub mod http;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;
