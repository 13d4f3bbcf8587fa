//! Minimal HTTP/1.1 client over a plain TCP connection.
//!
//! The phone is a single device on the local network, so every call opens a
//! fresh connection, performs one exchange and tears it down. The deadline
//! covers connect, handshake and response headers; the body read gets what is
//! left of it. Once the status is known it is never lost to a slow body: an
//! unfinished body is reported as `None`. The connection task is aborted on
//! every exit path.

use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST};
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::PhoneError;

/// A response received from the phone within the deadline.
#[derive(Debug, Clone)]
pub struct PhoneResponse {
    /// HTTP status returned by the phone.
    pub status: StatusCode,

    /// Response body, or `None` if it could not be read in full before the
    /// deadline.
    pub body: Option<String>,

    /// Time from the start of the call until response headers arrived.
    pub rtt: Duration,
}

/// Aborts the spawned connection driver when dropped.
///
/// Held until the body has been read (or given up on) so that the connection
/// is torn down on every exit path, including cancellation by the deadline.
struct ConnectionGuard(JoinHandle<()>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Send one HTTP request to `authority` (`host:port`) and wait at most
/// `timeout` for it to finish.
///
/// A JSON `body` is sent with `Content-Type: application/json`. Only the
/// response headers must arrive within `timeout`; the body is read with
/// whatever remains of it and comes back as `None` if it is cut short.
///
/// # Errors
/// Returns [`PhoneError::Timeout`] if no response headers arrive before the
/// deadline, [`PhoneError::NoResponse`] if the phone hangs up without
/// answering, [`PhoneError::Transport`] on connection or protocol errors and
/// [`PhoneError::InvalidRequest`] if `path` is not a valid request target.
pub async fn request_with_timeout(
    authority: &str,
    method: Method,
    path: &str,
    body: Option<String>,
    timeout: Duration,
) -> Result<PhoneResponse, PhoneError> {
    let started = Instant::now();
    let deadline = started.checked_add(timeout).unwrap_or_else(far_future);

    let (resp, _conn) =
        match tokio::time::timeout_at(deadline, send(authority, method, path, body)).await {
            Ok(result) => result?,
            Err(_) => return Err(PhoneError::Timeout { after: timeout }),
        };

    let rtt = started.elapsed();
    let status = resp.status();

    let body = match tokio::time::timeout_at(deadline, resp.into_body().collect()).await {
        Ok(Ok(collected)) => Some(String::from_utf8_lossy(&collected.to_bytes()).into_owned()),
        Ok(Err(e)) => {
            tracing::warn!(%status, error = %e, "failed to read phone response body");
            None
        }
        Err(_) => {
            tracing::warn!(
                %status,
                timeout_ms = duration_ms(timeout),
                "phone response body not finished before deadline"
            );
            None
        }
    };

    Ok(PhoneResponse { status, body, rtt })
}

/// Roughly 30 years out, for timeouts too large to add to `now`.
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86_400 * 365 * 30)
}

/// Connect, send the request and wait for the response headers.
async fn send(
    authority: &str,
    method: Method,
    path: &str,
    body: Option<String>,
) -> Result<(Response<Incoming>, ConnectionGuard), PhoneError> {
    let uri: Uri = path
        .parse()
        .map_err(|e| PhoneError::InvalidRequest(format!("invalid path {path}: {e}")))?;

    let stream = TcpStream::connect(authority)
        .await
        .map_err(|e| PhoneError::Transport(format!("connect to {authority}: {e}")))?;

    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io)
        .await
        .map_err(|e| PhoneError::Transport(format!("HTTP handshake: {e}")))?;

    let guard = ConnectionGuard(tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!("phone connection closed: {e}");
        }
    }));

    let body_bytes = body.map(Bytes::from).unwrap_or_default();
    let content_len = body_bytes.len();

    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(HOST, authority)
        .header(CONNECTION, "close");

    if content_len > 0 {
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_LENGTH, content_len.to_string());
    }

    let req = builder
        .body(Full::new(body_bytes))
        .map_err(|e| PhoneError::InvalidRequest(format!("build request: {e}")))?;

    let resp = sender.send_request(req).await.map_err(|e| {
        if e.is_incomplete_message() {
            PhoneError::NoResponse
        } else {
            PhoneError::Transport(format!("send request: {e}"))
        }
    })?;

    Ok((resp, guard))
}

/// Whole milliseconds of `elapsed`, saturating at `u64::MAX`.
#[must_use]
pub fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_ms_truncates_to_whole_millis() {
        assert_eq!(duration_ms(Duration::from_micros(1_999)), 1);
        assert_eq!(duration_ms(Duration::ZERO), 0);
    }

    #[test]
    fn duration_ms_saturates() {
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn invalid_path_is_rejected_before_connecting() {
        let result = request_with_timeout(
            "127.0.0.1:9",
            Method::GET,
            "not a path",
            None,
            Duration::from_secs(1),
        )
        .await;
        assert!(
            matches!(result, Err(PhoneError::InvalidRequest(_))),
            "malformed path must yield InvalidRequest, got {result:?}"
        );
    }

    #[tokio::test]
    async fn unroutable_connect_times_out() {
        // 10.255.255.1 is non-routable; the SYN is dropped, so only the deadline ends the call.
        let result = request_with_timeout(
            "10.255.255.1:80",
            Method::GET,
            "/ping",
            None,
            Duration::from_millis(50),
        )
        .await;
        match result {
            Err(PhoneError::Timeout { after }) => assert_eq!(after, Duration::from_millis(50)),
            // Sandboxed CI without a route fails fast instead of hanging.
            Err(PhoneError::Transport(_)) => {}
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
