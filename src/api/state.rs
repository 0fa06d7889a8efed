use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;
use uuid::Uuid;

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::blockchain::{Ledger, LedgerError};

/// Errors returned by the HTTP handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Ledger(#[from] LedgerError),

    #[error("Ledger lock poisoned")]
    LockPoisoned,

    #[error("Chain advanced while mining, try again")]
    StaleTail,

    #[error("Proof search did not finish within {0:?}")]
    MiningTimedOut(Duration),

    #[error("Proof search failed: {0}")]
    Blocking(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ledger(LedgerError::InvalidProof { .. }) => StatusCode::CONFLICT,
            ApiError::Ledger(LedgerError::InvalidDifficulty(_)) => StatusCode::BAD_REQUEST,
            ApiError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::StaleTail => StatusCode::CONFLICT,
            ApiError::MiningTimedOut(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Blocking(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        }

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

/// Shared application state
///
/// One lock guards the ledger, so requests touching it run one at a time.
pub struct AppState {
    /// Address that receives mining rewards
    pub node_id: String,

    pub ledger: Mutex<Ledger>,

    /// Upper bound on a single proof search, if any
    pub mine_timeout: Option<Duration>,
}

impl AppState {
    /// Creates the state for a node with a fresh random identity
    pub fn new(ledger: Ledger, mine_timeout: Option<Duration>) -> Self {
        AppState {
            node_id: Uuid::new_v4().simple().to_string(),
            ledger: Mutex::new(ledger),
            mine_timeout,
        }
    }

    /// Locks the ledger
    pub fn ledger(&self) -> Result<MutexGuard<'_, Ledger>, ApiError> {
        self.ledger.lock().map_err(|_| ApiError::LockPoisoned)
    }
}
