//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the front end.
//! It includes:
//!
//! - Error structures with source line information
//! - Specific error variants, classified as structural or semantic
//! - The diagnostics collector threaded through parsing
//! - Helpful error messages and suggestions

pub mod diagnostics;
pub mod errors;
