/// Primary key of every lab table (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// Audit timestamps (`created_at`, `updated_at`), stored as TIMESTAMPTZ in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
