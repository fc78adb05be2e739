//! HTTP transport abstraction, one blocking request at a time.
//!
//! The Discord adapter is generic over [`HttpTransport`], so it runs
//! unchanged against the ESP-IDF HTTP client on target and a scripted mock
//! in tests.
//!
//! Concrete implementations:
//! - [`EspHttpTransport`]: `esp_http_client` over TLS, server certificates
//!   checked against the ESP-IDF certificate bundle (espidf only).

use crate::error::TransportError;

/// Largest response body accepted, in bytes.
pub const MAX_BODY_LEN: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
}

/// A fully-formed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest<'a> {
    pub method: HttpMethod,
    pub url: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a [u8],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking request/response channel.
pub trait HttpTransport {
    /// Perform `request` and read the whole response body (at most
    /// [`MAX_BODY_LEN`] bytes).  A non-2xx status is not an error here.
    fn execute(&mut self, request: &HttpRequest<'_>) -> Result<HttpResponse, TransportError>;
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp_impl::EspHttpTransport;

#[cfg(target_os = "espidf")]
mod esp_impl {
    use core::time::Duration;

    use esp_idf_svc::http::Method;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use log::debug;

    use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, MAX_BODY_LEN};
    use crate::error::TransportError;

    const TIMEOUT: Duration = Duration::from_secs(10);

    /// `esp_http_client` wrapper.  A fresh connection per request: the poll
    /// rate is one request per second and keeps the TLS state small.
    pub struct EspHttpTransport {
        config: Configuration,
    }

    impl Default for EspHttpTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl EspHttpTransport {
        pub fn new() -> Self {
            Self {
                config: Configuration {
                    timeout: Some(TIMEOUT),
                    crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
                    ..Default::default()
                },
            }
        }
    }

    fn map_esp(e: esp_idf_svc::sys::EspError) -> TransportError {
        TransportError::Request(e.code())
    }

    impl HttpTransport for EspHttpTransport {
        fn execute(&mut self, request: &HttpRequest<'_>) -> Result<HttpResponse, TransportError> {
            let method = match request.method {
                HttpMethod::Get => Method::Get,
                HttpMethod::Put => Method::Put,
                HttpMethod::Post => Method::Post,
            };

            let mut conn = EspHttpConnection::new(&self.config).map_err(map_esp)?;
            let len = request.body.len().to_string();
            let mut headers: heapless::Vec<(&str, &str), 8> = heapless::Vec::new();
            for h in request.headers {
                headers.push(*h).map_err(|_| TransportError::Request(-1))?;
            }
            headers
                .push(("Content-Length", len.as_str()))
                .map_err(|_| TransportError::Request(-1))?;

            conn.initiate_request(method, request.url, &headers)
                .map_err(map_esp)?;
            let mut written = 0;
            while written < request.body.len() {
                written += conn.write(&request.body[written..]).map_err(map_esp)?;
            }
            conn.initiate_response().map_err(map_esp)?;

            let status = conn.status();
            let mut body = Vec::new();
            let mut chunk = [0_u8; 512];
            loop {
                let n = conn.read(&mut chunk).map_err(map_esp)?;
                if n == 0 {
                    break;
                }
                if body.len() + n > MAX_BODY_LEN {
                    return Err(TransportError::BodyTooLarge);
                }
                body.extend_from_slice(&chunk[..n]);
            }
            debug!("HTTP {:?} {} -> {} ({} B)", request.method, request.url, status, body.len());
            Ok(HttpResponse { status, body })
        }
    }
}
