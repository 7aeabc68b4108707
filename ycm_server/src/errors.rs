use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use fareharbor_tools::FareharborError;
use thiserror::Error;
use ycm_engine::{MemberApiError, ReferenceDataError, SettlementError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Malformed booking payload. {0}")]
    MalformedPayload(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not read request path: {0}")]
    InvalidRequestPath(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Booking has already been processed. {0}")]
    DuplicateBooking(String),
    #[error("Booking cannot be priced. {0}")]
    PricingUnavailable(String),
    #[error("A valid admin key is required")]
    MissingAdminKey,
    #[error("Requests from this peer are not allowed")]
    ForbiddenPeer,
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestPath(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateBooking(_) => StatusCode::CONFLICT,
            Self::PricingUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingAdminKey => StatusCode::UNAUTHORIZED,
            Self::ForbiddenPeer => StatusCode::FORBIDDEN,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<SettlementError> for ServerError {
    fn from(e: SettlementError) -> Self {
        match e {
            SettlementError::DuplicateBooking(_) => Self::DuplicateBooking(e.to_string()),
            SettlementError::YachtNotFound(_) => Self::NoRecordFound(e.to_string()),
            SettlementError::NoPriceFound { .. } => Self::PricingUnavailable(e.to_string()),
            SettlementError::DatabaseError(s) => Self::BackendError(s),
        }
    }
}

impl From<MemberApiError> for ServerError {
    fn from(e: MemberApiError) -> Self {
        match e {
            MemberApiError::MemberNotFound(_) => Self::NoRecordFound(e.to_string()),
            MemberApiError::InvalidAdjustment(_) => Self::InvalidRequestBody(e.to_string()),
            MemberApiError::MemberAlreadyExists(_) => Self::InvalidRequestBody(e.to_string()),
            MemberApiError::DatabaseError(s) => Self::BackendError(s),
        }
    }
}

impl From<ReferenceDataError> for ServerError {
    fn from(e: ReferenceDataError) -> Self {
        Self::BackendError(e.to_string())
    }
}

impl From<BookingConversionError> for ServerError {
    fn from(e: BookingConversionError) -> Self {
        Self::MalformedPayload(e.to_string())
    }
}

/// A FareHarbor payload that cannot be turned into a booking request.
#[derive(Debug, Clone, Error)]
pub enum BookingConversionError {
    #[error("{0}")]
    Vendor(#[from] FareharborError),
    #[error("Field '{field}' is invalid. {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum MailerError {
    #[error("Could not reach the mail relay. {0}")]
    RelayUnavailable(String),
    #[error("The mail relay rejected the message. Status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("The email is incomplete. {0}")]
    InvalidEmail(String),
}

#[cfg(test)]
mod test {
    use ycm_engine::db_types::VendorBookingId;

    use super::*;

    #[test]
    fn settlement_errors_map_to_status_codes() {
        let status = |e: SettlementError| ServerError::from(e).status_code();
        assert_eq!(status(SettlementError::DuplicateBooking(VendorBookingId::from("1"))), StatusCode::CONFLICT);
        assert_eq!(status(SettlementError::YachtNotFound("Ghost".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(SettlementError::NoPriceFound { yacht: "Top Shelf".into(), tour_type: None }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status(SettlementError::DatabaseError("disk full".into())), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn member_errors_map_to_status_codes() {
        let e = ServerError::from(MemberApiError::MemberNotFound("nobody".into()));
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        let e = ServerError::from(MemberApiError::InvalidAdjustment("zero".into()));
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
    }
}
