use crate::models::Requester;
use crate::startup::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use service_core::error::AppError;

/// Cookie carrying the viewer session token when no bearer header is sent.
pub const SESSION_COOKIE: &str = "_embed_session";

/// Resolves the requester from a bearer token or the session cookie.
///
/// Embeds are public pages, so a missing, invalid or expired token is not an
/// error: the request simply proceeds as anonymous.
#[async_trait]
impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Ok(Requester::Anonymous);
        };

        let claims = match state.sessions.validate(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session token");
                return Ok(Requester::Anonymous);
            }
        };

        match state.users.find_by_id(&claims.sub).await? {
            Some(user) => Ok(Requester::Authenticated(user)),
            None => {
                tracing::warn!(user_id = %claims.sub, "Session token for unknown user");
                Ok(Requester::Anonymous)
            }
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_wins() {
        let parts = parts(
            Request::builder()
                .header(header::AUTHORIZATION, "Bearer abc")
                .header(header::COOKIE, format!("{}=def", SESSION_COOKIE)),
        );
        assert_eq!(session_token(&parts).as_deref(), Some("abc"));
    }

    #[test]
    fn test_cookie_token() {
        let parts = parts(
            Request::builder().header(header::COOKIE, format!("theme=dark; {}=def", SESSION_COOKIE)),
        );
        assert_eq!(session_token(&parts).as_deref(), Some("def"));
    }

    #[test]
    fn test_no_token() {
        let parts = parts(Request::builder().header(header::AUTHORIZATION, "Basic Zm9vOmJhcg=="));
        assert!(session_token(&parts).is_none());
    }
}
