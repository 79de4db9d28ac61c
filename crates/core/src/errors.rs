use thiserror::Error;

/// Unified error type for the entire stock-portfolio-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
///
/// The valuation engine itself never produces one of these: missing prices,
/// broker names or dates degrade to defaults. Errors come from the
/// collaborators around it (store, price providers, auth, export).
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage / File ──────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No price provider registered")]
    NoProvider,

    #[error("Price not available for {symbol}")]
    PriceNotAvailable { symbol: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Stock not found: {0}")]
    StockNotFound(String),

    #[error("Broker not found: {0}")]
    BrokerNotFound(String),

    // ── Identity ────────────────────────────────────────────────────
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Email already registered: {0}")]
    EmailExists(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // ── Export ──────────────────────────────────────────────────────
    #[error("CSV export failed: {0}")]
    Csv(String),
}

impl CoreError {
    /// `true` when a provider answered but simply has no quote for the symbol.
    /// Distinguishes "unknown ticker" from an oracle outage.
    #[must_use]
    pub fn is_price_not_available(&self) -> bool {
        matches!(self, CoreError::PriceNotAvailable { .. })
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Csv(e.to_string())
    }
}

impl From<argon2::password_hash::Error> for CoreError {
    fn from(e: argon2::password_hash::Error) -> Self {
        CoreError::PasswordHash(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors often carry the full URL, including ?apikey=...
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
