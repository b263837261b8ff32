//! bootconf
//!
//! Process-start configuration: command-line overrides, environment
//! variables and layered property files merged behind one precedence
//! lookup, with logging configured from the result.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod observability;

pub use bootstrap::{Bootstrap, Bootstrapped};
pub use config::{keys, Config, Source, Value};
pub use error::{Error, Result};
pub use observability::{LogFormat, LoggingSettings};
