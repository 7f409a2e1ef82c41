//! SQL schema for the Marquee SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS movies (
    movie_id         TEXT PRIMARY KEY,
    title            TEXT NOT NULL,
    synopsis         TEXT NOT NULL,
    duration_minutes INTEGER NOT NULL,
    rating           TEXT NOT NULL,   -- age-rating label, free-form
    genre            TEXT NOT NULL,
    runs_from        TEXT NOT NULL,   -- ISO 8601 date
    runs_until       TEXT NOT NULL,   -- ISO 8601 date
    created_at       TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE TABLE IF NOT EXISTS rooms (
    room_id    TEXT PRIMARY KEY,
    number     INTEGER NOT NULL,      -- the house's display number
    capacity   INTEGER NOT NULL,
    created_at TEXT NOT NULL
);

-- Deleting a movie or room that a session references is refused (no
-- cascade); deleting a session with sold tickets likewise.
CREATE TABLE IF NOT EXISTS sessions (
    session_id TEXT PRIMARY KEY,
    movie_id   TEXT NOT NULL REFERENCES movies(movie_id),
    room_id    TEXT NOT NULL REFERENCES rooms(room_id),
    starts_at  TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Tickets are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table. The UNIQUE
-- constraint is the storage-level guarantee that no seat sells twice,
-- independent of the in-memory ledger.
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id   TEXT PRIMARY KEY,
    session_id  TEXT NOT NULL REFERENCES sessions(session_id),
    seat        TEXT NOT NULL,        -- canonical form, e.g. 'A1'
    fare        TEXT NOT NULL,        -- 'full' | 'half'
    price_cents INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (session_id, seat)
);

CREATE INDEX IF NOT EXISTS sessions_movie_idx  ON sessions(movie_id);
CREATE INDEX IF NOT EXISTS sessions_room_idx   ON sessions(room_id);
CREATE INDEX IF NOT EXISTS tickets_session_idx ON tickets(session_id);

PRAGMA user_version = 1;
";
