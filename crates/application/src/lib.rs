//! Application layer - Use cases and orchestration
//!
//! Defines the provider-facing ports and the planning services that combine
//! direct and intermodal journey candidates into one CO2-ranked list.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
