//! SWTOR Character Assembler CLI Library
//!
//! This library exposes the command implementations and preferences
//! handling behind the `swca` binary.

pub mod commands;
pub mod config;
