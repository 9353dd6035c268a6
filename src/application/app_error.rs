use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed token")]
    MalformedToken,

    #[error("Invalid signature")]
    SignatureInvalid,

    #[error("Unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("Missing required claim: {0}")]
    ClaimMissing(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::MalformedToken => ErrorCode::MalformedToken,
            AppError::SignatureInvalid => ErrorCode::SignatureInvalid,
            AppError::UnsupportedAlgorithm => ErrorCode::UnsupportedAlgorithm,
            AppError::ClaimMissing(_) => ErrorCode::ClaimMissing,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    MalformedToken,
    SignatureInvalid,
    UnsupportedAlgorithm,
    ClaimMissing,
    InvalidCredentials,
    InvalidInput,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedToken => "MALFORMED_TOKEN",
            ErrorCode::SignatureInvalid => "SIGNATURE_INVALID",
            ErrorCode::UnsupportedAlgorithm => "UNSUPPORTED_ALGORITHM",
            ErrorCode::ClaimMissing => "CLAIM_MISSING",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::InvalidSignature => AppError::SignatureInvalid,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                AppError::UnsupportedAlgorithm
            }
            ErrorKind::MissingRequiredClaim(claim) => AppError::ClaimMissing(claim.clone()),
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => AppError::MalformedToken,
            ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidEcdsaKey
            | ErrorKind::InvalidRsaKey(_) => AppError::Internal(e.to_string()),
            _ => AppError::MalformedToken,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
