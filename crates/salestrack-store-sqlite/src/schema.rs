//! SQL schema for the salestrack SQLite store.
//!
//! Tables and indexes are created in two steps at connect time so that a
//! failed index build is reported separately from a failed connection.
//! Both batches are idempotent.

/// Collection tables.
pub const TABLES: &str = "
CREATE TABLE IF NOT EXISTS users (
    user_id  TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    email    TEXT NOT NULL,
    age      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS leads (
    lead_id       TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    company       TEXT NOT NULL,
    company_size  INTEGER NOT NULL,
    email         TEXT NOT NULL,
    phone         TEXT,
    job_title     TEXT,
    source        TEXT NOT NULL,   -- snake_case LeadSource
    status        TEXT NOT NULL DEFAULT 'new',
    interactions  TEXT NOT NULL DEFAULT '[]',   -- JSON array, append-only
    score         REAL NOT NULL DEFAULT 0,
    category      TEXT NOT NULL,   -- Cold | Warm | Hot | Premium
    created_at    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    updated_at    TEXT NOT NULL
);
";

/// Unique and lookup indexes. A NULL phone never conflicts, so leads without
/// a phone number coexist.
pub const INDEXES: &str = "
CREATE UNIQUE INDEX IF NOT EXISTS users_email_uq ON users(email);
CREATE INDEX        IF NOT EXISTS users_name_idx ON users(name);

CREATE UNIQUE INDEX IF NOT EXISTS leads_email_uq ON leads(email);
CREATE UNIQUE INDEX IF NOT EXISTS leads_phone_uq ON leads(phone);

PRAGMA user_version = 1;
";
