// src/core/mod.rs

//! Core data structures and types

pub mod complex;
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qlab::core::TypeName`
pub use complex::Amplitude;
pub use error::{GateId, QlabError, Result};
pub use state::{InputState, QubitPreset};
