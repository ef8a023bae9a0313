//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Extraction result model (records, queries, reports)
//! - Typed errors
//! - Rendering functions for different output formats
//! - Source file reading
//! - Common utilities

pub mod error;
pub mod file_reader;
pub mod model;
pub mod render;
pub mod util;
