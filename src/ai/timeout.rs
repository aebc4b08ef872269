//! Per-attempt timeout helper.
//!
//! Remote providers bound every request with `with_timeout_map`; an expired
//! attempt surfaces as `DocgenError::Timeout` and is retried like any other
//! transport failure.

use std::future::Future;
use std::time::Duration;

use crate::types::{DocgenError, Result};

/// Execute an async operation with a timeout, wrapping its output
///
/// # Example
///
/// ```ignore
/// let reply = with_timeout_map(
///     Duration::from_secs(30),
///     transport.post_json(url, &headers, &body),
///     "LLM request"
/// ).await?;
/// ```
pub async fn with_timeout_map<T, F>(timeout: Duration, future: F, operation_name: &str) -> Result<T>
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => Ok(result),
        Err(_) => Err(DocgenError::timeout(operation_name, timeout)),
    }
}
