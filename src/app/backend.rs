use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::media::ExtractResult;

use super::errors::{AppError, ExtractError};

/// The remote extraction service.
///
/// Implementations must honor `cancel` by abandoning the call and returning
/// [`ExtractError::Cancelled`], never a generic failure.
#[async_trait]
pub trait ExtractBackend: Send + Sync {
    async fn extract(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractResult, ExtractError>;

    /// Capability probes. These never gate extraction.
    async fn status(&self) -> Result<ServerStatus, AppError>;
}

#[derive(Debug, Clone, Default)]
pub struct ServerStatus {
    pub healthy: bool,
    /// raw body of `/api/cookies/status`, when the server exposes it
    pub cookies: Option<serde_json::Value>,
}
