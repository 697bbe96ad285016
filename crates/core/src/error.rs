//! Error model shared by the planning crates.

use thiserror::Error;

/// Result type used by the rollup engine and its collaborators.
pub type PlanResult<T> = Result<T, PlanError>;

/// Failure of an external collaborator (catalog, ledger, calendar store).
///
/// These are infrastructure errors. The engine never retries them: a partial
/// ledger read cannot be reconciled, so they end the whole invocation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store could not be reached or refused the read.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// An in-process store lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Rollup error taxonomy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// A referenced buffer, item, location or calendar does not exist.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Ledger contents contradict each other (missing balance, dangling document).
    ///
    /// Normally recovered per row and reported as a row flag; surfaced as an
    /// error only where no recovery applies.
    #[error("data inconsistency: {0}")]
    DataInconsistency(String),

    /// The requested date range is empty or not covered by buckets.
    #[error("invalid range: {0}")]
    Range(String),

    /// A collaborator read failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller cancelled the rollup; partial output was discarded.
    #[error("rollup cancelled")]
    Cancelled,
}

impl PlanError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn inconsistency(msg: impl Into<String>) -> Self {
        Self::DataInconsistency(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn poisoned(what: impl Into<String>) -> Self {
        Self::LockPoisoned(what.into())
    }
}
