use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::AppState;

const BASIC_REALM: &str = "Basic realm=\"admin\", charset=\"UTF-8\"";

/// HTTP basic auth guard for the admin panel.
pub async fn admin_basic_auth<B>(
    State(state): State<AppState>,
    req: Request<B>,
    next: Next<B>,
) -> Response {
    let Some((username, password)) = state.config.admin.credentials() else {
        tracing::error!("Admin request refused: ADMIN_USERNAME/ADMIN_PASSWORD are not configured");
        return AppError::Configuration("admin credentials are not configured".to_string())
            .into_response();
    };

    match basic_credentials(req.headers()) {
        Some((user, pass)) if credentials_match((user.as_str(), pass.as_str()), (username, password)) => {
            next.run(req).await
        }
        _ => {
            tracing::warn!(uri = %req.uri(), "Admin request with missing or invalid credentials");
            let mut response =
                AppError::Unauthorized("invalid admin credentials".to_string()).into_response();
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(BASIC_REALM));
            response
        }
    }
}

/// Compares both parts in constant time; both are always evaluated.
fn credentials_match(given: (&str, &str), expected: (&str, &str)) -> bool {
    let user = given.0.as_bytes().ct_eq(expected.0.as_bytes());
    let pass = given.1.as_bytes().ct_eq(expected.1.as_bytes());
    (user & pass).into()
}

fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn decodes_basic_credentials() {
        let encoded = STANDARD.encode("admin:s3cr:et");
        let creds = basic_credentials(&headers_with(&format!("Basic {}", encoded)));
        assert_eq!(creds, Some(("admin".to_string(), "s3cr:et".to_string())));
    }

    #[test]
    fn matches_credentials_exactly() {
        assert!(credentials_match(("admin", "secret"), ("admin", "secret")));
        assert!(!credentials_match(("admin", "secreT"), ("admin", "secret")));
        assert!(!credentials_match(("admin", "secret "), ("admin", "secret")));
        assert!(!credentials_match(("root", "secret"), ("admin", "secret")));
        assert!(!credentials_match(("", ""), ("admin", "secret")));
    }

    #[test]
    fn ignores_other_schemes() {
        assert!(basic_credentials(&headers_with("Bearer abc")).is_none());
        assert!(basic_credentials(&headers_with("Basic not-base64!")).is_none());
        assert!(basic_credentials(&HeaderMap::new()).is_none());
    }
}
