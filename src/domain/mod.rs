pub mod models;
pub mod pricing;
pub mod errors;

pub use models::*;
pub use pricing::*;
pub use errors::*;
