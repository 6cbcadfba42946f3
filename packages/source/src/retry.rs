//! HTTP retry helper for transient feed errors.
//!
//! The feed is fetched while a dashboard request is waiting, so the budget
//! is small: a few attempts with short exponential backoff, then give up
//! and let the caller degrade to an empty batch.

use std::time::Duration;

use crate::SourceError;

/// Maximum number of retry attempts after the first request.
///
/// Backoff is 1s, 2s, 4s, so the worst-case wait before giving up is 7
/// seconds plus the per-request timeouts.
pub const MAX_RETRIES: u32 = 3;

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 300;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// Retries up to [`MAX_RETRIES`] times on connection errors, timeouts,
/// HTTP 429, and HTTP 5xx. Other 4xx responses are permanent. A body that
/// is not valid JSON is not retried: open-data portals answer key and quota
/// problems with XML error documents that will not change on a re-fetch.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails after all retries, the
/// server returns a non-retryable status, or the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_with_retry(&build_request, MAX_RETRIES).await?;

    let url = response.url().to_string();
    let status = response.status();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let text = response.text().await?;

    serde_json::from_str(&text).map_err(|json_err| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::error!(
            "Feed response is not JSON.\n  \
             url: {url}\n  \
             status: {status}\n  \
             content-type: {content_type:?}\n  \
             parse error: {json_err}\n  \
             body preview: {preview}",
        );
        SourceError::Normalization {
            message: format!(
                "JSON parse failed: {json_err} (status={status}, content-type={content_type:?})"
            ),
        }
    })
}

/// Sends the request built by `build_request`, retrying transient failures
/// up to `max_retries` times with exponential backoff.
#[allow(clippy::future_not_send)]
async fn send_with_retry<F>(
    build_request: &F,
    max_retries: u32,
) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = backoff(attempt);
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        let can_retry = attempt < max_retries;
        attempt += 1;

        match build_request().send().await {
            Err(e) if is_transient(&e) && can_retry => {
                log::warn!("  transient error: {e}");
            }
            Err(e) => return Err(SourceError::Http(e)),
            Ok(response) => {
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    if can_retry {
                        log::warn!("  HTTP {status} (retryable)");
                        continue;
                    }
                    return Err(SourceError::Normalization {
                        message: format!("HTTP {status} after {max_retries} retries"),
                    });
                }

                if status.is_client_error() {
                    return Err(SourceError::Normalization {
                        message: format!("HTTP {status}"),
                    });
                }

                return Ok(response);
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): 1s, 2s, 4s, ...
fn backoff(attempt: u32) -> Duration {
    Duration::from_secs(1u64 << attempt.saturating_sub(1).min(6))
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_request()
}
