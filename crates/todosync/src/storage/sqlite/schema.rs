//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Tasks table
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    image_url TEXT,
    is_local_only INTEGER NOT NULL DEFAULT 0,
    is_modified INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

-- Display order: local-only first, newest first
CREATE INDEX IF NOT EXISTS idx_tasks_display_order ON tasks(is_local_only, created_at);
"#;

pub const INSERT_OR_REPLACE_TASK: &str = r#"
INSERT OR REPLACE INTO tasks (id, title, completed, image_url, is_local_only, is_modified, created_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
"#;

pub const SELECT_ALL_TASKS: &str = r#"
SELECT id, title, completed, image_url, is_local_only, is_modified, created_at
FROM tasks
ORDER BY is_local_only DESC, created_at DESC, id ASC
"#;

pub const SELECT_TASK_BY_ID: &str = r#"
SELECT id, title, completed, image_url, is_local_only, is_modified, created_at
FROM tasks
WHERE id = ?1
"#;

pub const UPDATE_TASK: &str = r#"
UPDATE tasks
SET title = ?2, completed = ?3, image_url = ?4, is_modified = ?5
WHERE id = ?1
"#;

pub const DELETE_TASK: &str = r#"
DELETE FROM tasks
WHERE id = ?1
"#;

pub const DELETE_SYNCED_UNMODIFIED_TASKS: &str = r#"
DELETE FROM tasks
WHERE is_local_only = 0 AND is_modified = 0
"#;

pub const SELECT_MODIFIED_SYNCED_IDS: &str = r#"
SELECT id
FROM tasks
WHERE is_local_only = 0 AND is_modified = 1
"#;

pub const SELECT_NEXT_LOCAL_ID: &str = r#"
SELECT MIN(COALESCE(MIN(id), 0), 0) - 1
FROM tasks
"#;
