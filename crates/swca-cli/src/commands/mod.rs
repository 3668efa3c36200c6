//! CLI command implementations

pub mod assemble;
pub mod config;
pub mod doctor;
pub mod plan;
pub mod prefix;

mod reporting;
