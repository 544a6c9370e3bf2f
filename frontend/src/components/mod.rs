//! UI Components for the Filedrop application.
//!
//! This module contains all Leptos components organized by function:
//!
//! # Layout Components
//! - [`Header`] - Page title
//! - [`Footer`] - Page footer
//!
//! # Feature Components
//! - [`UploadPage`] - Upload flow wiring and file list
//! - [`UploadDropzone`] - File picking with drag & drop
//! - [`ProgressItem`] - One running upload with its Cancel button
//! - [`FileTable`] - Uploaded files with download links

mod header;
mod upload;
mod progress;
mod file_table;
mod page;
mod footer;

pub use header::*;
pub use upload::*;
pub use progress::*;
pub use file_table::*;
pub use page::*;
pub use footer::*;
