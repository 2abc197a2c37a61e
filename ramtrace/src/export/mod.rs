//! Extraction report export
//!
//! Alongside the raw trace bytes, the decoded control structure and the
//! wrap decision can be saved as JSON so a crash analysis can be
//! reproduced without the original dump.

pub mod report;

pub use report::ExtractionReport;
