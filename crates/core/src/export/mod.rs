//! Delimited-text export of a month's transactions.

pub mod csv;

pub use csv::{CSV_CONTENT_TYPE, export_filename, render_csv};
