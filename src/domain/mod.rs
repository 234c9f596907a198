//! # Domain Layer
//!
//! Trip requests, generation outcomes, and the error taxonomy.
//! This layer is independent of the runtime, providers, and CLI.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
