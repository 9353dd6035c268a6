use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use strum::Display;
use time::{Duration, OffsetDateTime};

use crate::app_error::{AppError, AppResult};

/// Registered claim names the service always sets itself.
pub const SUBJECT: &str = "sub";
pub const ISSUED_AT: &str = "iat";
pub const EXPIRES_AT: &str = "exp";

const RESERVED: [&str; 3] = [SUBJECT, ISSUED_AT, EXPIRES_AT];

/// Claim set carried in a token payload.
///
/// `iat` and `exp` are Unix timestamps in seconds. Anything else the caller
/// attached at issue time lands in `extra` and is serialized flat next to the
/// registered claims.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Builds a claim set valid for `ttl` from `issued_at`.
    ///
    /// Extras named like a registered claim are dropped, the registered value wins.
    pub fn new(
        subject: impl Into<String>,
        issued_at: OffsetDateTime,
        ttl: Duration,
        mut extra: Map<String, Value>,
    ) -> Self {
        for name in RESERVED {
            extra.remove(name);
        }
        let iat = issued_at.unix_timestamp();
        Self {
            sub: subject.into(),
            iat,
            exp: iat + ttl.whole_seconds(),
            extra,
        }
    }

    /// Splits a decoded payload into registered and extra claims.
    pub fn from_payload(mut payload: Map<String, Value>) -> AppResult<Self> {
        let sub = match payload.remove(SUBJECT) {
            Some(Value::String(sub)) => sub,
            Some(_) => return Err(AppError::MalformedToken),
            None => return Err(AppError::ClaimMissing(SUBJECT.into())),
        };
        let iat = take_timestamp(&mut payload, ISSUED_AT)?;
        let exp = take_timestamp(&mut payload, EXPIRES_AT)?;
        Ok(Self {
            sub,
            iat,
            exp,
            extra: payload,
        })
    }

    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> AppResult<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.iat)
            .map_err(|_| AppError::MalformedToken)
    }

    pub fn expires_at(&self) -> AppResult<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.exp)
            .map_err(|_| AppError::MalformedToken)
    }

    /// Reads an extra claim as `T`.
    pub fn extra_claim<T: DeserializeOwned>(&self, name: &str) -> AppResult<T> {
        let value = self
            .extra
            .get(name)
            .ok_or_else(|| AppError::ClaimMissing(name.to_string()))?;
        serde_json::from_value(value.clone())
            .map_err(|e| AppError::InvalidInput(format!("claim {name}: {e}")))
    }
}

fn take_timestamp(payload: &mut Map<String, Value>, name: &str) -> AppResult<i64> {
    match payload.remove(name) {
        Some(value) => numeric_date(&value).ok_or(AppError::MalformedToken),
        None => Err(AppError::ClaimMissing(name.to_string())),
    }
}

/// Reads a NumericDate: whole or fractional seconds, fractions floored.
fn numeric_date(value: &Value) -> Option<i64> {
    if let Some(secs) = value.as_i64() {
        return Some(secs);
    }
    let secs = value.as_f64()?.floor();
    let in_range = secs >= i64::MIN as f64 && secs < i64::MAX as f64;
    in_range.then_some(secs as i64)
}

/// Lifecycle state of a token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TokenState {
    /// Signature intact and `iat <= now < exp`.
    Valid,
    /// Signature intact but `now >= exp`.
    Expired,
    /// Structure, algorithm or signature check failed.
    Invalid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn extras(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_new_sets_seven_day_window() {
        let issued_at = datetime!(2024-01-01 12:00:00.750 UTC);
        let claims = Claims::new("alice", issued_at, Duration::days(7), Map::new());

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iat, 1_704_110_400);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_registered_claims_override_extras() {
        let claims = Claims::new(
            "alice",
            datetime!(2024-01-01 00:00 UTC),
            Duration::days(7),
            extras(json!({ "sub": "mallory", "exp": 9_999_999_999_i64, "role": "admin" })),
        );

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, claims.iat + 604_800);
        assert_eq!(claims.extra.len(), 1);
        assert_eq!(claims.extra["role"], "admin");
    }

    #[test]
    fn test_serializes_flat() {
        let claims = Claims::new(
            "alice",
            datetime!(2024-01-01 00:00 UTC),
            Duration::days(7),
            extras(json!({ "tenant": "acme" })),
        );

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({ "sub": "alice", "iat": 1_704_067_200, "exp": 1_704_672_000, "tenant": "acme" })
        );
    }

    #[test]
    fn test_from_payload_reports_missing_claim() {
        let result = Claims::from_payload(extras(json!({ "sub": "alice", "iat": 1 })));
        assert!(matches!(result, Err(AppError::ClaimMissing(name)) if name == "exp"));

        let result = Claims::from_payload(extras(json!({ "iat": 1, "exp": 2 })));
        assert!(matches!(result, Err(AppError::ClaimMissing(name)) if name == "sub"));
    }

    #[test]
    fn test_from_payload_rejects_wrong_types() {
        let result = Claims::from_payload(extras(json!({ "sub": 42, "iat": 1, "exp": 2 })));
        assert!(matches!(result, Err(AppError::MalformedToken)));

        let result =
            Claims::from_payload(extras(json!({ "sub": "a", "iat": "yesterday", "exp": 2 })));
        assert!(matches!(result, Err(AppError::MalformedToken)));
    }

    #[test]
    fn test_from_payload_floors_fractional_timestamps() {
        let claims = Claims::from_payload(extras(
            json!({ "sub": "bob", "iat": 1_700_000_000.25, "exp": 1_700_604_800.999 }),
        ))
        .unwrap();

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp, 1_700_604_800);
    }

    #[test]
    fn test_from_payload_rejects_out_of_range_timestamps() {
        let result = Claims::from_payload(extras(json!({ "sub": "bob", "iat": 1, "exp": 1e300 })));
        assert!(matches!(result, Err(AppError::MalformedToken)));

        let result = Claims::from_payload(extras(
            json!({ "sub": "bob", "iat": 1, "exp": 18_446_744_073_709_551_615_u64 }),
        ));
        assert!(matches!(result, Err(AppError::MalformedToken)));
    }

    #[test]
    fn test_extra_claim_lookup() {
        let claims = Claims::from_payload(extras(
            json!({ "sub": "alice", "iat": 1, "exp": 2, "scopes": ["read", "write"] }),
        ))
        .unwrap();

        let scopes: Vec<String> = claims.extra_claim("scopes").unwrap();
        assert_eq!(scopes, vec!["read", "write"]);
        assert!(matches!(
            claims.extra_claim::<String>("tenant"),
            Err(AppError::ClaimMissing(name)) if name == "tenant"
        ));
    }

    #[test]
    fn test_token_state_display() {
        assert_eq!(TokenState::Valid.to_string(), "valid");
        assert_eq!(TokenState::Expired.to_string(), "expired");
        assert_eq!(TokenState::Invalid.to_string(), "invalid");
    }
}
