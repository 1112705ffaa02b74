use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use volt_core::BookingError;
use volt_engine::{CheckoutError, StoreError};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Booking(#[from] BookingError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Station {station_id} not found")]
    StationNotFound { station_id: String },
    #[error("Booking {wizard_id} not found")]
    WizardNotFound { wizard_id: Uuid },
    #[error("Marketplace state is unavailable")]
    StatePoisoned,
}

impl From<CheckoutError> for ApiError {
    fn from(error: CheckoutError) -> Self {
        match error {
            CheckoutError::Booking(error) => ApiError::Booking(error),
            CheckoutError::Store(error) => ApiError::Store(error),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Booking(error) => match error {
                BookingError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                BookingError::AmenityNotFound { .. } => StatusCode::NOT_FOUND,
                BookingError::SlotIncomplete
                | BookingError::StepMismatch { .. }
                | BookingError::InvalidTransition { .. }
                | BookingError::AlreadyConfirmed
                | BookingError::AmenityCapReached { .. } => StatusCode::CONFLICT,
                BookingError::PaymentMethodUnavailable { .. }
                | BookingError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,
                // Transient, the client may submit again
                BookingError::SubmissionFailed { .. } => StatusCode::SERVICE_UNAVAILABLE,
            },
            ApiError::StationNotFound { .. } | ApiError::WizardNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Store(_) | ApiError::StatePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
