use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use super::dto::ErrorMessage;
use crate::chain::ChainError;
use crate::prices::PriceError;

/// Error returned by HTTP handlers: a status code plus an `{ "error": .. }` body.
#[derive(Debug)]
pub struct Error {
    pub code: StatusCode,
    pub body: Json<ErrorMessage>,
}

impl Error {
    pub fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            body: Json(ErrorMessage::new(message)),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.code, self.body).into_response()
    }
}

impl From<ChainError> for Error {
    fn from(error: ChainError) -> Self {
        let code = match error {
            ChainError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            ChainError::Rpc(_) => StatusCode::BAD_GATEWAY,
            ChainError::NotFound(_) => StatusCode::NOT_FOUND,
        };
        Self::new(code, &error.to_string())
    }
}

impl From<PriceError> for Error {
    fn from(error: PriceError) -> Self {
        match error {
            PriceError::BadRequest => Self::new(StatusCode::BAD_REQUEST, &error.to_string()),
            // Store details stay in the logs.
            PriceError::Store(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_errors_map_to_distinct_statuses() {
        assert_eq!(
            Error::from(ChainError::Configuration).code,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            Error::from(ChainError::Rpc("reverted".into())).code,
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::from(ChainError::NotFound("entry 9".into())).code,
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn store_errors_hide_details() {
        let error = Error::from(PriceError::Store(sqlx::Error::PoolTimedOut));
        assert_eq!(error.code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.body.error, "Internal server error");

        let error = Error::from(PriceError::BadRequest);
        assert_eq!(error.code, StatusCode::BAD_REQUEST);
        assert_eq!(error.body.error, "Missing required parameters");
    }
}
