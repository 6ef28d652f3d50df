use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ec2_console_common::{ConsoleError, ErrorResponse, Locale};

/// A `ConsoleError` bound to the caller's locale, ready to become a response.
#[derive(Debug)]
pub struct ApiError {
    pub error: ConsoleError,
    pub locale: Locale,
}

impl ApiError {
    pub fn new(error: ConsoleError, locale: Locale) -> Self {
        Self { error, locale }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.error.message(self.locale),
            code: Some(self.error.category().to_string()),
        };
        (status, Json(body)).into_response()
    }
}
