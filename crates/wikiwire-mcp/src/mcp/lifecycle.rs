//! Server lifecycle: `start` binds the handler to a transport, `stop` tears it down.
//!
//! Signal handling lives in the binary; this module only knows how to stop.

use anyhow::{Context, Result};
use rmcp::service::{QuitReason, RoleServer, RunningService, RunningServiceCancellationToken};
use rmcp::transport::{stdio, IntoTransport};
use rmcp::ServiceExt;

use super::WikiMcp;

pub struct McpServer {
    handler: WikiMcp,
}

pub struct RunningServer {
    service: RunningService<RoleServer, WikiMcp>,
}

/// Detached stop trigger, usable from another task while the server is being awaited.
pub struct StopHandle(RunningServiceCancellationToken);

impl StopHandle {
    pub fn stop(self) {
        self.0.cancel();
    }
}

impl McpServer {
    pub fn new(handler: WikiMcp) -> Self {
        Self { handler }
    }

    pub async fn start(self) -> Result<RunningServer> {
        self.start_on(stdio()).await
    }

    pub async fn start_on<T, E, A>(self, transport: T) -> Result<RunningServer>
    where
        T: IntoTransport<RoleServer, E, A>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let service = self
            .handler
            .serve(transport)
            .await
            .context("failed to start MCP service")?;
        tracing::info!("MCP server started");
        Ok(RunningServer { service })
    }
}

impl RunningServer {
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.service.cancellation_token())
    }

    /// Cancel the service and wait for its task to finish.
    pub async fn stop(self) -> Result<QuitReason> {
        let reason = self
            .service
            .cancel()
            .await
            .context("MCP service task failed during shutdown")?;
        tracing::info!(?reason, "MCP server stopped");
        Ok(reason)
    }

    /// Wait until the client disconnects or a [`StopHandle`] fires.
    pub async fn wait(self) -> Result<QuitReason> {
        let reason = self
            .service
            .waiting()
            .await
            .context("MCP service task failed")?;
        tracing::info!(?reason, "MCP server finished");
        Ok(reason)
    }
}
