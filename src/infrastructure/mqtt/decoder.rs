use chrono::{NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::entities::reading::Reading;

/// Only this subtype carries sensor data; everything else on the namespace
/// is reserved for future extensions and silently ignored.
pub const DATA_SUBTYPE: &str = "data";

/// Wire format of the payload timestamp, interpreted as UTC.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("topic '{0}' does not match <namespace>/<device>/<subtype>")]
    MalformedTopic(String),
    #[error("invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
    #[error("invalid timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        source: chrono::format::ParseError,
    },
}

/// Raw JSON payload of a data message.
#[derive(Debug, Deserialize)]
struct RawPayload {
    timestamp: String,
    humidity: f64,
    temperature: f64,
}

/// Parse topic and payload into a typed [`Reading`].
///
/// Returns `Ok(None)` for well-formed topics whose subtype is not
/// [`DATA_SUBTYPE`] — those are not errors.
///
/// # Errors
///
/// Returns `DecodeError` if the topic does not match
/// `<namespace>/<deviceId>/<subtype>`, the payload is not valid JSON with
/// numeric `humidity`/`temperature`, or the timestamp does not parse as
/// `DD/MM/YYYY HH:MM:SS`.
pub fn decode(
    namespace: &str,
    topic: &str,
    payload: &[u8],
) -> Result<Option<Reading>, DecodeError> {
    let mut parts = topic.split('/');
    let (Some(ns), Some(device_id), Some(subtype), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DecodeError::MalformedTopic(topic.to_string()));
    };

    if ns != namespace || device_id.is_empty() || subtype.is_empty() {
        return Err(DecodeError::MalformedTopic(topic.to_string()));
    }

    if subtype != DATA_SUBTYPE {
        return Ok(None);
    }

    let raw: RawPayload = serde_json::from_slice(payload)?;

    let naive = NaiveDateTime::parse_from_str(&raw.timestamp, TIMESTAMP_FORMAT).map_err(
        |source| DecodeError::InvalidTimestamp {
            value: raw.timestamp.clone(),
            source,
        },
    )?;

    Ok(Some(Reading {
        device_id: device_id.to_string(),
        humidity: raw.humidity,
        temperature: raw.temperature,
        event_timestamp: naive.and_utc(),
        received_at: Utc::now(),
    }))
}
