//! Text host and command-line driver for the `pilot_core` navigation stack.

#![allow(missing_docs)]

pub mod commands;
pub mod config;
pub mod demo;
pub mod host;
pub mod logging;
pub mod script;
