//! Toolchain configuration CLI library
//!
//! Resolves which configuration file and network the operator means, and
//! renders loaded descriptors for the terminal.

pub mod config;
pub mod summary;

pub use config::{Selection, SelectionError};
