//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` (or the narrower domain code)
//! carrying `{field, code}` details so clients can highlight the offending
//! input.

use serde_json::json;

use crate::domain::{
    Error, ItemCategory, ItemId, ItemValidationError, OfferId, ParseItemCategoryError, UserId,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
    TooLong,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::TooLong => "too_long",
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

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_value_error(field: FieldName, value: &str, message: &str) -> Error {
    ValidationError::new(field.as_str(), message).with_value(ErrorCode::InvalidValue, value)
}

pub(crate) fn parse_item_id(value: &str, field: FieldName) -> Result<ItemId, Error> {
    ItemId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_offer_id(value: &str, field: FieldName) -> Result<OfferId, Error> {
    OfferId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: FieldName) -> Result<UserId, Error> {
    UserId::new(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_category(value: &str, field: FieldName) -> Result<ItemCategory, Error> {
    value.parse().map_err(|err: ParseItemCategoryError| {
        invalid_value_error(field, value, &err.to_string())
    })
}

/// Map item field validation onto a field-scoped `invalid_request`.
pub(crate) fn map_item_validation_error(err: ItemValidationError) -> Error {
    let (field, code) = match &err {
        ItemValidationError::InvalidId => ("id", ErrorCode::InvalidUuid),
        ItemValidationError::EmptyTitle => ("title", ErrorCode::MissingField),
        ItemValidationError::TitleTooLong { .. } => ("title", ErrorCode::TooLong),
        ItemValidationError::PlaceTooLong { field, .. } => (*field, ErrorCode::TooLong),
        ItemValidationError::EmptyMediaReference => ("image", ErrorCode::InvalidValue),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}
