//! vcast-si CLI library.
//!
//! This crate provides configuration loading, logging setup, the interactive
//! compound test case menu, and the command implementations behind the
//! `vcast-si` binary.

pub mod commands;
pub mod config;
pub mod logging;
pub mod prompt;
