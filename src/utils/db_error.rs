//! Classification of database failures into the outcomes callers care about.

/// Name of the unique constraint guarding `links.code`.
pub const LINKS_CODE_CONSTRAINT: &str = "links_code_key";

/// What a failed statement means for the link operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbFailure {
    /// SQLSTATE 23505 on [`LINKS_CODE_CONSTRAINT`]: the short code is taken.
    CodeTaken,
    /// No pooled connection became free within the acquire timeout.
    PoolExhausted,
    /// Anything else: connection loss, other constraint, bad SQL.
    Unavailable,
}

impl DbFailure {
    pub fn classify(e: &sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut => Self::PoolExhausted,
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(LINKS_CODE_CONSTRAINT) =>
            {
                Self::CodeTaken
            }
            _ => Self::Unavailable,
        }
    }
}
