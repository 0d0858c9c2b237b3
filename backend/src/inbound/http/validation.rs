//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request ids are validated as UUIDs before any store filter is built from
//! them, and dates are accepted either as calendar dates (`YYYY-MM-DD`) or
//! full RFC 3339 timestamps.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{AttendanceStatus, Error};

/// Validation error codes attached to HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidStatus,
    InvalidRole,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidDate => "invalid_date",
            Self::InvalidStatus => "invalid_status",
            Self::InvalidRole => "invalid_role",
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

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn value_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
    )
}

/// Require a field to be present and non-blank; the original treated empty
/// strings as missing and so do we.
pub(crate) fn require_field(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Ok(raw),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        value_error(
            field,
            format!("{name} must be a valid UUID"),
            ErrorCode::InvalidId,
            value,
        )
    })
}

/// Parse an identifier that may legitimately be absent; blank values count
/// as absent, anything else must be a valid UUID.
pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_uuid(raw.trim(), field).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let trimmed = value.trim();
    if let Ok(day) = trimmed.parse::<NaiveDate>() {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            let name = field.as_str();
            value_error(
                field,
                format!("{name} must be a calendar date (YYYY-MM-DD) or an RFC 3339 timestamp"),
                ErrorCode::InvalidDate,
                value,
            )
        })
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_date(&raw, field).map(Some),
        _ => Ok(None),
    }
}

pub(crate) fn parse_status(value: &str, field: FieldName) -> Result<AttendanceStatus, Error> {
    value.parse::<AttendanceStatus>().map_err(|_| {
        let name = field.as_str();
        value_error(
            field,
            format!("{name} must be Present or Absent"),
            ErrorCode::InvalidStatus,
            value,
        )
    })
}

pub(crate) fn invalid_role_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    value_error(
        field,
        format!("{name} must be admin or teacher"),
        ErrorCode::InvalidRole,
        value,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("classId");

    #[rstest]
    #[case(None)]
    #[case(Some(String::new()))]
    #[case(Some("   ".to_owned()))]
    fn require_field_rejects_absent_and_blank(#[case] value: Option<String>) {
        let error = require_field(value, FIELD).expect_err("field rejected");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
        assert_eq!(
            error
                .details()
                .and_then(|details| details.get("code"))
                .and_then(serde_json::Value::as_str),
            Some("missing_field")
        );
    }

    #[rstest]
    fn parse_uuid_rejects_malformed_ids_with_context() {
        let error = parse_uuid("655f0c1c", FIELD).expect_err("malformed id rejected");
        let details = error.details().expect("details attached");
        assert_eq!(
            details.get("value").and_then(serde_json::Value::as_str),
            Some("655f0c1c")
        );
    }

    #[rstest]
    #[case("2024-02-01", "2024-02-01T00:00:00Z")]
    #[case("2024-02-01T09:30:00Z", "2024-02-01T09:30:00Z")]
    #[case("2024-02-01T09:30:00+05:30", "2024-02-01T04:00:00Z")]
    fn parse_date_accepts_dates_and_timestamps(#[case] input: &str, #[case] expected: &str) {
        let parsed = parse_date(input, FieldName::new("date")).expect("date parses");
        let expected = DateTime::parse_from_rfc3339(expected)
            .expect("valid expectation")
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
    }

    #[rstest]
    #[case("yesterday")]
    #[case("01/02/2024")]
    fn parse_date_rejects_other_formats(#[case] input: &str) {
        assert!(parse_date(input, FieldName::new("from")).is_err());
    }

    #[rstest]
    fn parse_optional_uuid_treats_blank_as_absent() {
        let parsed =
            parse_optional_uuid(Some("  ".to_owned()), FIELD).expect("blank is absent");
        assert!(parsed.is_none());
    }

    #[rstest]
    fn parse_status_rejects_labels_outside_the_enum() {
        let error = parse_status("Late", FieldName::new("status")).expect_err("label rejected");
        assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    }
}
