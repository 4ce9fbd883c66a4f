// ABOUTME: Root module for crewtools - tool adapters for agent runtimes.
// ABOUTME: Re-exports the tool contract, configuration, and error types.

pub mod catalog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod normalize;
pub mod prelude;
pub mod retry;
pub mod tool;
pub mod tools;

pub use config::{Secret, ToolConfig};
pub use error::{ErrorKind, ToolError};
