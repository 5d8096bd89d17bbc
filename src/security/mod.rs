//! Security headers and the Content-Security-Policy pipeline

mod csp;
mod report;

pub use csp::CspBuilder;
pub use report::{CspReport, CspReportBody};

use axum::http::{header, HeaderValue, Request, Response};

/// The fixed header set attached to every response, plus the CSP string
/// built once at startup.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    csp: HeaderValue,
}

impl SecurityHeaders {
    /// Build the header set for a site.
    ///
    /// `dev` relaxes the CSP for the live-reload websocket and eval-based
    /// tooling; `analytics_host` is whitelisted for scripts when set.
    pub fn new(dev: bool, analytics_host: Option<&str>) -> Self {
        let mut csp = CspBuilder::default_policy();

        if let Some(host) = analytics_host {
            csp.push("script-src", host);
            csp.push("connect-src", host);
        }

        if dev {
            csp.push("script-src", "'unsafe-eval'");
            csp.push("connect-src", "ws:");
            csp.push("connect-src", "wss:");
        }

        let value = csp.build();
        let csp = HeaderValue::from_str(&value)
            .unwrap_or_else(|_| HeaderValue::from_static("default-src 'self'"));

        Self { csp }
    }

    /// Apply the full header set to a response
    pub fn apply<B>(&self, response: &mut Response<B>) {
        let headers = response.headers_mut();
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
        headers.insert(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        );
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
        headers.insert(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        );
        headers.insert(
            "permissions-policy",
            HeaderValue::from_static("camera=(), microphone=(), geolocation=()"),
        );
        headers.insert(header::CONTENT_SECURITY_POLICY, self.csp.clone());
    }
}

/// axum middleware applying the security header set to every response
pub async fn security_headers_middleware(
    axum::extract::State(headers): axum::extract::State<std::sync::Arc<SecurityHeaders>>,
    request: Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Response<axum::body::Body> {
    let mut response = next.run(request).await;
    headers.apply(&mut response);
    response
}
