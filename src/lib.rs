//! printquote - Terminal Cost Estimation Form
//!
//! An interactive terminal application for pricing 3D-print jobs: rate
//! tables are read from a quote-template spreadsheet, a form collects the
//! job parameters, and the computed breakdown can be exported as PDF, PNG,
//! an updated template copy, or JSON.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
