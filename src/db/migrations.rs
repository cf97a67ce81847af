use sqlx::SqlitePool;

/// One named, independently idempotent schema step.
struct Migration {
    table: &'static str,
    ddl: &'static str,
    indexes: &'static [&'static str],
}

/// Steps run in foreign-key dependency order, so a failure partway through
/// leaves the last applied step visible in the log.
const MIGRATIONS: &[Migration] = &[
    Migration {
        table: "users",
        ddl: "CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name          TEXT NOT NULL,
            role          TEXT NOT NULL DEFAULT 'customer'
                          CHECK(role IN ('customer', 'contractor', 'seller')),
            phone         TEXT,
            city          TEXT,
            created_at    TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        indexes: &[],
    },
    Migration {
        table: "sessions",
        ddl: "CREATE TABLE IF NOT EXISTS sessions (
            token      TEXT PRIMARY KEY,
            user_id    INTEGER NOT NULL REFERENCES users(id),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)"],
    },
    Migration {
        table: "tenders",
        ddl: "CREATE TABLE IF NOT EXISTS tenders (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id    INTEGER NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            category    TEXT NOT NULL,
            budget      INTEGER,
            city        TEXT,
            deadline    TEXT,
            status      TEXT NOT NULL DEFAULT 'open'
                        CHECK(status IN ('open', 'in_progress', 'closed')),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_tenders_owner ON tenders(owner_id)",
            "CREATE INDEX IF NOT EXISTS idx_tenders_status ON tenders(status)",
        ],
    },
    Migration {
        table: "listings",
        ddl: "CREATE TABLE IF NOT EXISTS listings (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            seller_id   INTEGER NOT NULL REFERENCES users(id),
            title       TEXT NOT NULL,
            description TEXT NOT NULL,
            category    TEXT NOT NULL,
            deal_type   TEXT NOT NULL DEFAULT 'sell'
                        CHECK(deal_type IN ('sell', 'rent', 'buy')),
            price       INTEGER,
            city        TEXT,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_listings_seller ON listings(seller_id)",
            "CREATE INDEX IF NOT EXISTS idx_listings_category ON listings(category)",
        ],
    },
    Migration {
        table: "messages",
        ddl: "CREATE TABLE IF NOT EXISTS messages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            sender_id   INTEGER NOT NULL REFERENCES users(id),
            receiver_id INTEGER NOT NULL REFERENCES users(id),
            content     TEXT NOT NULL,
            is_read     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        )",
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_messages_receiver ON messages(receiver_id, is_read)",
            "CREATE INDEX IF NOT EXISTS idx_messages_sender ON messages(sender_id)",
        ],
    },
    Migration {
        table: "reviews",
        ddl: "CREATE TABLE IF NOT EXISTS reviews (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            author_id  INTEGER NOT NULL REFERENCES users(id),
            subject_id INTEGER NOT NULL REFERENCES users(id),
            rating     INTEGER NOT NULL CHECK(rating BETWEEN 1 AND 5),
            comment    TEXT,
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            UNIQUE(author_id, subject_id)
        )",
        indexes: &["CREATE INDEX IF NOT EXISTS idx_reviews_subject ON reviews(subject_id)"],
    },
];

/// Applies every pending schema step. Safe to call on every startup: steps
/// whose table already exists are skipped. Any store error propagates to the
/// caller, which is expected to treat it as fatal.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for migration in MIGRATIONS {
        apply(pool, migration).await?;
    }
    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<(), sqlx::Error> {
    tracing::info!("Checking for table {}", migration.table);

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(migration.table)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        tracing::info!("Table {} already present, skipping", migration.table);
        return Ok(());
    }

    // IF NOT EXISTS closes the window between the probe and the create if
    // another process raced us to it.
    sqlx::query(migration.ddl).execute(pool).await?;
    for index in migration.indexes {
        sqlx::query(index).execute(pool).await?;
    }

    tracing::info!("Table {} created successfully", migration.table);
    Ok(())
}
