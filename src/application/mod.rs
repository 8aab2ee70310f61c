//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! managing form state, recomputation, and export workflows.

pub mod state;

pub use state::*;
