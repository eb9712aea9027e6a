//! Bearer token extraction from HTTP requests.
//!
//! The token is looked up under one name, [`TOKEN_NAME`], in this order:
//! an `Authorization: Bearer <token>` header, a cookie, then a form value
//! (urlencoded body when available, then the query string). The first
//! non-empty match wins. A request carrying no token yields an empty string,
//! which never validates.

use ::http::{HeaderMap, Request, header};
use url::form_urlencoded;

/// Header, cookie and form field name carrying the token
pub const TOKEN_NAME: &str = "Authorization";

const BEARER: &str = "Bearer";

/// Token from the header, cookie or query string of `req`.
#[must_use]
pub fn token_from_request<B>(req: &Request<B>) -> String {
    token_from_header(req.headers())
        .or_else(|| token_from_cookie(req.headers()))
        .or_else(|| req.uri().query().and_then(token_from_form))
        .unwrap_or_default()
}

/// Like [`token_from_request`], also consulting an urlencoded request body
/// before the query string.
#[must_use]
pub fn token_from_request_with_body<B: AsRef<[u8]>>(req: &Request<B>) -> String {
    token_from_header(req.headers())
        .or_else(|| token_from_cookie(req.headers()))
        .or_else(|| {
            is_form_body(req.headers())
                .then(|| token_from_form_bytes(req.body().as_ref()))
                .flatten()
        })
        .or_else(|| req.uri().query().and_then(token_from_form))
        .unwrap_or_default()
}

/// `Authorization: Bearer <token>`; any other scheme is ignored.
fn token_from_header(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    (scheme == BEARER && !token.is_empty()).then(|| token.to_string())
}

fn token_from_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_NAME)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

fn is_form_body(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

fn token_from_form(query: &str) -> Option<String> {
    token_from_form_bytes(query.as_bytes())
}

fn token_from_form_bytes(form: &[u8]) -> Option<String> {
    form_urlencoded::parse(form)
        .find(|(name, _)| name == TOKEN_NAME)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
