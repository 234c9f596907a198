//! # Application Layer
//!
//! The generation lifecycle controller and the caller-side session state
//! that coordinate the domain with provider connectors.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
