//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{percent_of, round_minor, MINOR_UNIT_DP};
