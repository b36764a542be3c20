//! themecap captures the color of every themed resource of a host under several themes and
//! merges them into one record per resource, ready to export as a workbook, csv or json
#![forbid(
    clippy::missing_docs_in_private_items,
    missing_docs,
    rustdoc::missing_crate_level_docs
)]

pub mod macros;

#[cfg(feature = "cli")]
pub mod app;
pub mod capture;
pub mod color;
pub mod config;
pub mod error;
pub mod export;
pub mod host;
pub mod models;
pub mod utils;

pub use {
    capture::ThemeCapture,
    error::{Result, TcError},
    export::{ExportPlan, export},
    models::MergedDataset,
};
