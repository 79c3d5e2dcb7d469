//! # Aletheia
//!
//! The application layer around `aletheia-core`: CLI, configuration,
//! HTTP text generators, the premise REPL and background reasoning.
//!
//! This is the only part of the workspace that touches the network or
//! the async runtime. The core sees generators only through its
//! `TextGenerator` trait.

pub mod cli;
pub mod config;
pub mod generator;
pub mod repl;
pub mod think;
