//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::{Error, FaqId, TicketId, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidId,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn invalid_value(field: FieldName, code: ErrorCode, message: String, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        invalid_value(
            field,
            ErrorCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
            value,
        )
    })
}

pub(crate) fn parse_ticket_id(value: &str) -> Result<TicketId, Error> {
    parse_uuid(value, FieldName::new("id")).map(TicketId::from_uuid)
}

pub(crate) fn parse_faq_id(value: &str) -> Result<FaqId, Error> {
    parse_uuid(value, FieldName::new("id")).map(FaqId::from_uuid)
}

pub(crate) fn parse_user_id(value: &str) -> Result<UserId, Error> {
    parse_uuid(value, FieldName::new("id")).map(UserId::from_uuid)
}

/// Parse a positive integer path identifier such as a faculty id.
pub(crate) fn parse_numeric_id(value: &str, field: FieldName) -> Result<u32, Error> {
    value.parse::<u32>().map_err(|_| {
        let name = field.as_str();
        invalid_value(
            field,
            ErrorCode::InvalidId,
            format!("{name} must be a positive integer"),
            value,
        )
    })
}
