//! Compiling stylesheets with the external `sassc` binary.

/// Platform-specific compiler binary resolution.
pub mod binary;
/// The compile filter.
pub mod filter;
/// Compiler flag configuration.
pub mod options;
/// Process execution seam and the system implementation.
pub mod process;
