//! Single poll stage against one endpoint.
//!
//! A stage is one blocking GET/collect exchange with its own timeout. Stage
//! failures are not escalated: a timed-out or refused exchange logs a warning
//! and the caller still gets whatever text is present in the buffer (possibly
//! empty), because the turn continues either way.

use crate::net::response::ResponseBuffer;
use std::time::Duration;

/// Perform one exchange and return the collected text.
///
/// Never fails: transport errors degrade to the accumulated (often empty)
/// result. The buffer is finished and reset in all paths, so a later stage
/// can reuse it.
pub async fn poll_stage(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    buffer: &mut ResponseBuffer,
) -> String {
    let response = match client.get(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(url, error = %e, "poll request failed");
            return buffer.finish();
        }
    };

    if let Err(e) = buffer.collect(response).await {
        tracing::warn!(url, error = %e, "poll body collection failed");
    }
    buffer.finish()
}
