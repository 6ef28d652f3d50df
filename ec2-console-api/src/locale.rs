use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};
use ec2_console_common::Locale;
use std::convert::Infallible;
use std::sync::Arc;

use crate::app::AppState;

/// Locale of the caller: `Accept-Language` first, then the configured default.
pub fn preferred_locale(headers: &HeaderMap, fallback: Locale) -> Locale {
    headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(Locale::from_accept_language)
        .unwrap_or(fallback)
}

/// Extractor so handlers get the locale alongside their other arguments.
#[derive(Debug, Clone, Copy)]
pub struct RequestLocale(pub Locale);

impl FromRequestParts<Arc<AppState>> for RequestLocale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestLocale(preferred_locale(
            &parts.headers,
            state.default_locale,
        )))
    }
}
