//! Configuration module
//!
//! Settings are plain values constructed by the owner (defaults, YAML file,
//! environment) and passed into the components that need them; nothing in
//! this crate holds process-wide mutable configuration.

mod settings;

pub use settings::*;
