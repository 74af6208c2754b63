//! Core library for the bilan-achats command line application.
//!
//! The tool ingests the two expenditure exports produced by the CNRS and
//! INSA management systems, aggregates amounts by NACRES category code, and
//! renders a tab-separated report. The modules are structured to keep
//! responsibilities narrow and composable: the ODS adapter lives under
//! [`io`], data representations inside [`model`], the per-source normalizers
//! in [`normalize`], the dictionary merge in [`merge`], the artifact
//! rendering in [`report`], and the end-to-end orchestration under
//! [`aggregate`].

pub mod aggregate;
pub mod error;
pub mod io;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod report;

pub use aggregate::{aggregate, aggregate_files};
pub use error::{Result, ToolError};
