//! Command handlers.

pub mod config;
pub mod process;
pub mod serve;
