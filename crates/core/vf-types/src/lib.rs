//! Core types for vpcflow-stream.
//!
//! This crate provides the foundational types used throughout the system:
//! - [`LogFile`] - Metadata parsed from one listed flow log object
//! - [`LogContent`] - A consumable, decompressed content handle for one file

pub mod content;
pub mod log_file;

pub use content::*;
pub use log_file::*;
