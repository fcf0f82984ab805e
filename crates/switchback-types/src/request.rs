use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::Variant;

/// Opaque request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        RequestId(id.into())
    }

    /// Build an id from 16 caller-supplied random bytes (UUID v4 layout)
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        RequestId(uuid::Builder::from_random_bytes(bytes).into_uuid().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(id: Uuid) -> Self {
        RequestId(id.to_string())
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId(s.to_string())
    }
}

/// One synthetic ride request.
///
/// `is_completed` and `order_value` are derived from the acceptance flags at
/// construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestRecordFields")]
pub struct RequestRecord {
    request_id: RequestId,
    timestamp: DateTime<Utc>,
    window_start: DateTime<Utc>,
    variant: Variant,
    price_quoted: f64,
    driver_found: bool,
    user_accepted: bool,
    is_completed: bool,
    order_value: f64,
}

impl RequestRecord {
    pub fn new(
        request_id: RequestId,
        timestamp: DateTime<Utc>,
        window_start: DateTime<Utc>,
        variant: Variant,
        price_quoted: f64,
        driver_found: bool,
        user_accepted: bool,
    ) -> Self {
        let is_completed = driver_found && user_accepted;
        RequestRecord {
            request_id,
            timestamp,
            window_start,
            variant,
            price_quoted,
            driver_found,
            user_accepted,
            is_completed,
            order_value: if is_completed { price_quoted } else { 0.0 },
        }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn window_start(&self) -> DateTime<Utc> {
        self.window_start
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn price_quoted(&self) -> f64 {
        self.price_quoted
    }

    pub fn driver_found(&self) -> bool {
        self.driver_found
    }

    pub fn user_accepted(&self) -> bool {
        self.user_accepted
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    /// Price paid if the ride completed, 0.0 otherwise
    pub fn order_value(&self) -> f64 {
        self.order_value
    }
}

/// Wire shape of a record; checked against the derivation rules on the way in
#[derive(Deserialize)]
struct RequestRecordFields {
    request_id: RequestId,
    timestamp: DateTime<Utc>,
    window_start: DateTime<Utc>,
    variant: Variant,
    price_quoted: f64,
    driver_found: bool,
    user_accepted: bool,
    is_completed: bool,
    order_value: f64,
}

impl TryFrom<RequestRecordFields> for RequestRecord {
    type Error = String;

    fn try_from(f: RequestRecordFields) -> Result<Self, Self::Error> {
        let record = RequestRecord::new(
            f.request_id,
            f.timestamp,
            f.window_start,
            f.variant,
            f.price_quoted,
            f.driver_found,
            f.user_accepted,
        );

        if record.is_completed != f.is_completed {
            return Err(format!(
                "request {}: is_completed must equal driver_found && user_accepted",
                record.request_id
            ));
        }
        if record.order_value != f.order_value {
            return Err(format!(
                "request {}: order_value must be price_quoted when completed and 0 otherwise",
                record.request_id
            ));
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, minute, 0).unwrap()
    }

    #[test]
    fn test_completion_requires_both_sides() {
        let cases = [
            (true, true, true),
            (true, false, false),
            (false, true, false),
            (false, false, false),
        ];

        for (driver, user, completed) in cases {
            let rec = RequestRecord::new(
                RequestId::new("r"),
                at(5),
                at(0),
                Variant::Control,
                12.5,
                driver,
                user,
            );
            assert_eq!(rec.is_completed(), completed);
            assert_eq!(rec.order_value(), if completed { 12.5 } else { 0.0 });
        }
    }

    #[test]
    fn test_request_id_from_bytes_is_uuid() {
        let id = RequestId::from_random_bytes([7u8; 16]);
        let parsed = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }
}
