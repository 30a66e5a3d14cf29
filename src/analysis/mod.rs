//! GPA aggregation and reporting.
//!
//! This module provides:
//! - GPA calculation over an active grade range
//! - CSV reading for manually entered grade counts
//! - JSON export of GPA reports

pub mod csv_reader;
pub mod export;
pub mod gpa;

pub use gpa::{aggregate, compute_gpa, compute_gpa_with_scale, summarize, GpaBand, GpaSummary};
