use thiserror::Error;

/// Unified error type for the entire couple-finance-core library.
///
/// The pure calculations (growth, aggregation, reports) never fail; only
/// data access and mutations return `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend / Network ───────────────────────────────────────────
    #[error("Backend error on table '{table}' (HTTP {status}): {message}")]
    Api {
        table: String,
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    // ── Partner Linking ─────────────────────────────────────────────
    #[error("Partner not linked. Please link your partner first.")]
    PartnerNotLinked,

    #[error("Partner not found with username '{0}'")]
    PartnerNotFound(String),

    #[error("This user is already linked to another partner")]
    PartnerAlreadyLinked,

    #[error("An account cannot be linked to itself")]
    SelfLink,

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("{kind} not found: {id}")]
    RecordNotFound { kind: String, id: String },
}

impl CoreError {
    pub(crate) fn not_found(kind: &str, id: impl ToString) -> Self {
        CoreError::RecordNotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query strings: filters may carry ids and the key must never leak.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
