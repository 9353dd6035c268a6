use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{
    app_error::{AppError, AppResult},
    application::{jwt::TokenSigner, ports::clock::Clock},
    domain::entities::claims::{Claims, TokenState},
};

/// How long an issued token stays valid.
pub const TOKEN_TTL: Duration = Duration::days(7);

/// Issues tokens for authenticated subjects and validates presented ones.
///
/// Holds no per-call state: the signer is immutable and the clock is only
/// read, so one instance can be shared across threads behind an `Arc`.
#[derive(Clone)]
pub struct TokenService {
    signer: Arc<TokenSigner>,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(signer: Arc<TokenSigner>, clock: Arc<dyn Clock>) -> Self {
        Self { signer, clock }
    }

    pub fn issue(&self, subject: &str) -> AppResult<String> {
        self.issue_with_claims(subject, Map::new())
    }

    /// Issues a token carrying `extra` next to `sub`, `iat` and `exp`.
    ///
    /// Extra claims using a registered name are overwritten.
    pub fn issue_with_claims(&self, subject: &str, extra: Map<String, Value>) -> AppResult<String> {
        if subject.trim().is_empty() {
            return Err(AppError::InvalidInput("subject must not be empty".into()));
        }

        let claims = Claims::new(subject, self.clock.now_utc(), TOKEN_TTL, extra);
        let token = self.signer.sign(&claims)?;
        debug!(subject, iat = claims.iat, exp = claims.exp, "token issued");
        Ok(token)
    }

    /// Verifies `token` and projects its claims through `selector`.
    ///
    /// Every other accessor goes through here, so no claim is ever read from an
    /// unverified token. Expiry is not checked.
    pub fn extract_claim<T>(
        &self,
        token: &str,
        selector: impl FnOnce(&Claims) -> T,
    ) -> AppResult<T> {
        let claims = self.signer.verify(token)?;
        Ok(selector(&claims))
    }

    pub fn extract_subject(&self, token: &str) -> AppResult<String> {
        self.extract_claim(token, |claims| claims.sub.clone())
    }

    pub fn extract_issued_at(&self, token: &str) -> AppResult<OffsetDateTime> {
        self.extract_claim(token, Claims::issued_at)?
    }

    pub fn extract_expiration(&self, token: &str) -> AppResult<OffsetDateTime> {
        self.extract_claim(token, Claims::expires_at)?
    }

    /// Reads a caller-supplied claim as `T`; `ClaimMissing` when absent.
    pub fn extract_extra<T: DeserializeOwned>(&self, token: &str, name: &str) -> AppResult<T> {
        self.extract_claim(token, |claims| claims.extra_claim(name))?
    }

    pub fn extract_all(&self, token: &str) -> AppResult<Claims> {
        self.extract_claim(token, Claims::clone)
    }

    /// Current lifecycle state of `token`, evaluated against the clock.
    pub fn state(&self, token: &str) -> TokenState {
        self.extract_claim(token, |claims| self.window_state(claims))
            .unwrap_or(TokenState::Invalid)
    }

    /// True iff `token` is authentic, unexpired and issued to `expected_subject`.
    ///
    /// Never fails: malformed and forged tokens are simply not valid.
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.authenticate(token, expected_subject).is_ok()
    }

    /// Like [`is_valid`](Self::is_valid) but hands back the claims.
    ///
    /// Every rejection is reported as `InvalidCredentials`; the specific reason
    /// is only logged.
    pub fn authenticate(&self, token: &str, expected_subject: &str) -> AppResult<Claims> {
        let outcome =
            self.extract_claim(token, |claims| (self.window_state(claims), claims.clone()));

        let reason = match outcome {
            Ok((TokenState::Valid, claims)) if claims.sub == expected_subject => return Ok(claims),
            Ok((TokenState::Valid, _)) => "SUBJECT_MISMATCH",
            Ok((TokenState::Expired, _)) => "EXPIRED",
            Ok((TokenState::Invalid, _)) => "OUTSIDE_VALIDITY_WINDOW",
            Err(e) => e.code().as_str(),
        };
        debug!(reason, "token rejected");
        Err(AppError::InvalidCredentials)
    }

    fn window_state(&self, claims: &Claims) -> TokenState {
        let now = self.clock.now_utc();
        match (claims.issued_at(), claims.expires_at()) {
            (Ok(iat), Ok(_)) if iat > now => TokenState::Invalid,
            (Ok(_), Ok(exp)) if now < exp => TokenState::Valid,
            (Ok(_), Ok(_)) => TokenState::Expired,
            _ => TokenState::Invalid,
        }
    }
}
