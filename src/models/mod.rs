//! Data models

pub mod prediction;
pub mod status;

pub use prediction::*;
pub use status::*;
