//! CLI command implementations.

pub mod common;
pub mod mark;
pub mod prepare;
pub mod show;
