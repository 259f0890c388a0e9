//! Core types shared by the sdiffer facilities
//!
//! - **Correlation types**: SessionId, identifying one Differ session in logs
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::SessionId;
