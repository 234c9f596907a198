//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Text generation providers (Gemini, Anthropic-compatible, offline mock)
//! - The CLI-facing container, router, and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
