//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing and semantic analysis
//! - Helpful error messages and suggestions
//!
//! Every error is fatal: stages return it up the call chain and the driver
//! stops before producing any further output.

pub mod errors;
