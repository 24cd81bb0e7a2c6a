//! Builds a playlist from a music directory.

mod scan;

pub use scan::scan;

#[cfg(test)]
mod tests;
