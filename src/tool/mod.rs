// ABOUTME: Tool module - defines the adapter contract, registry, and invocation.
// ABOUTME: Core abstraction every external-service adapter implements.

mod descriptor;
mod invoke;
mod registry;
mod result;
pub mod schema;
mod traits;

pub use descriptor::*;
pub use invoke::*;
pub use registry::*;
pub use result::*;
pub use traits::*;

#[cfg(test)]
mod registry_test;
#[cfg(test)]
mod schema_test;
