//! Procwatch core - platform-independent supervisor, configuration, and traits
//!
//! This crate provides the liveness supervisor state machine plus the traits
//! that platform-specific crates implement: the process probe (listing,
//! finding, and terminating processes) and the status sink (outbound
//! notification channel).

mod config;
mod error;
mod probe;
mod publish;
mod status;
mod supervisor;

pub use config::*;
pub use error::*;
pub use probe::*;
pub use publish::*;
pub use status::*;
pub use supervisor::*;
