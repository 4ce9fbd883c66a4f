// ABOUTME: Invocation helpers layered on every Tool - validation, execution,
// ABOUTME: and flattening into the string contract the agent runtime expects.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use tracing::{Instrument, debug, error, info_span, warn};

use super::{Tool, schema};
use crate::error::ToolError;
use crate::normalize;

/// Invocation entry points available on every [`Tool`].
#[async_trait]
pub trait ToolExt: Tool {
    /// Validate `params` against the tool's schema, then execute it.
    ///
    /// No upstream call is made when validation fails.
    async fn try_invoke(&self, params: serde_json::Value) -> Result<String, ToolError>;

    /// Like [`ToolExt::try_invoke`], but failures are rendered as an
    /// `{"error": ...}` envelope. Never fails, even if the tool panics.
    async fn invoke(&self, params: serde_json::Value) -> String;

    /// Blocking variant of [`ToolExt::invoke`].
    ///
    /// The call runs on a private runtime in a scoped thread, so it is
    /// usable from plain threads and from inside an async runtime alike.
    fn invoke_blocking(&self, params: serde_json::Value) -> String;
}

#[async_trait]
impl<T: Tool + ?Sized> ToolExt for T {
    async fn try_invoke(&self, params: serde_json::Value) -> Result<String, ToolError> {
        let params = schema::drop_nulls(params);
        schema::validate(&self.schema(), &params)?;
        self.execute(params).await?.into_output()
    }

    async fn invoke(&self, params: serde_json::Value) -> String {
        let span = info_span!(
            "invoke",
            tool = %self.name(),
            invocation = %uuid::Uuid::new_v4()
        );
        async {
            match AssertUnwindSafe(self.try_invoke(params)).catch_unwind().await {
                Ok(Ok(output)) => {
                    debug!(bytes = output.len(), "tool call succeeded");
                    output
                }
                Ok(Err(e)) => {
                    warn!(kind = %e.kind(), error = %e, "tool call failed");
                    normalize::error_envelope(&e)
                }
                Err(_) => {
                    error!("tool call panicked");
                    normalize::error_envelope(&panicked(self.name()))
                }
            }
        }
        .instrument(span)
        .await
    }

    fn invoke_blocking(&self, params: serde_json::Value) -> String {
        std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| ToolError::Execution(e.into()))?;
                Ok::<_, ToolError>(runtime.block_on(self.invoke(params)))
            });
            match handle.join() {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => normalize::error_envelope(&e),
                Err(_) => normalize::error_envelope(&panicked(self.name())),
            }
        })
    }
}

fn panicked(tool: &str) -> ToolError {
    ToolError::Execution(anyhow::anyhow!("tool '{}' panicked", tool))
}
