//! Infrastructure layer providing external format integrations.
//!
//! This module contains the template workbook reader/writer and the
//! PDF, PNG, and JSON export paths.

pub mod workbook;
pub mod pdf;
pub mod image;
pub mod persistence;

pub use workbook::*;
pub use pdf::*;
pub use image::*;
pub use persistence::*;
