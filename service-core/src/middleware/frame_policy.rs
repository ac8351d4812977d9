use axum::{extract::Request, http::header, middleware::Next, response::Response};

/// Path prefix of pages meant to be embedded in third-party iframes.
pub const EMBED_PATH_PREFIX: &str = "/embed/";

/// Sets hardening headers. Embed pages may be framed by any origin; every
/// other route refuses framing.
pub async fn frame_policy_middleware(req: Request, next: Next) -> Response {
    let embeddable = req.uri().path().starts_with(EMBED_PATH_PREFIX);

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if embeddable {
        headers.remove(header::X_FRAME_OPTIONS);
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static("frame-ancestors *"),
        );
    } else {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            header::HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        );
        headers.insert(
            header::X_FRAME_OPTIONS,
            header::HeaderValue::from_static("DENY"),
        );
    }

    response
}
