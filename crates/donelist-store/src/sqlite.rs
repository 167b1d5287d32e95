//! SQLite-backed task store
//!
//! Persistent backend with WAL mode, a small connection pool, and schema
//! initialization on open. Timestamps are stored as integer milliseconds
//! since the Unix epoch; the ordering contract is expressed directly in
//! SQL so that `NULL` due dates sort last.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, params_from_iter};

use donelist_core::{
    DayWindow, NewTask, StoreError, StoreResult, Task, TaskFilter, TaskId, TaskPatch, TaskQuery,
};

use crate::store::TaskStore;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS tasks (
    id             TEXT PRIMARY KEY,
    title          TEXT NOT NULL,
    completed      INTEGER NOT NULL DEFAULT 0,
    due_date_ms    INTEGER,
    created_at_ms  INTEGER NOT NULL,
    updated_at_ms  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks (due_date_ms);
CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks (completed);
";

const ORDER_CLAUSE: &str =
    "ORDER BY (due_date_ms IS NULL) ASC, due_date_ms ASC, created_at_ms DESC";

/// Pool of SQLite connections shared by clones of the store.
struct SqlitePool {
    available: Mutex<Vec<Connection>>,
    active: Mutex<usize>,
    path: PathBuf,
    max_connections: usize,
}

impl SqlitePool {
    fn checkout(&self) -> StoreResult<Connection> {
        let mut available = self
            .available
            .lock()
            .map_err(|e| StoreError::backend(format!("pool lock poisoned: {e}")))?;
        if let Some(conn) = available.pop() {
            return Ok(conn);
        }
        drop(available);

        let mut active = self
            .active
            .lock()
            .map_err(|e| StoreError::backend(format!("pool lock poisoned: {e}")))?;
        if *active >= self.max_connections {
            return Err(StoreError::PoolExhausted);
        }
        let conn = open_connection(&self.path)?;
        *active += 1;
        Ok(conn)
    }

    fn checkin(&self, conn: Connection) {
        if let Ok(mut available) = self.available.lock() {
            available.push(conn);
        }
    }
}

/// Persistent [`TaskStore`] over a SQLite database file.
#[derive(Clone)]
pub struct SqliteTaskStore {
    pool: Arc<SqlitePool>,
}

impl SqliteTaskStore {
    /// Default pool size; single-user traffic rarely needs more.
    const POOL_SIZE: usize = 4;

    /// Open (or create) the database at `path` and initialize the schema.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = open_connection(&path)?;
        conn.execute_batch(SCHEMA).map_err(StoreError::backend)?;
        tracing::info!(path = %path.display(), "Opened sqlite task store");

        Ok(Self {
            pool: Arc::new(SqlitePool {
                available: Mutex::new(vec![conn]),
                active: Mutex::new(1),
                path,
                max_connections: Self::POOL_SIZE,
            }),
        })
    }

    /// Run a blocking database operation on a pooled connection without
    /// stalling the async runtime.
    async fn with_conn<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let mut conn = pool.checkout()?;

        let joined = tokio::task::spawn_blocking(move || {
            let result = op(&mut conn);
            (conn, result)
        })
        .await;

        match joined {
            Ok((conn, result)) => {
                pool.checkin(conn);
                result
            }
            Err(join_error) => Err(StoreError::backend(join_error)),
        }
    }
}

fn open_connection(path: &Path) -> StoreResult<Connection> {
    let conn = Connection::open(path).map_err(StoreError::backend)?;
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
    .map_err(|e| StoreError::backend(format!("failed to configure sqlite: {e}")))?;
    Ok(conn)
}

/// Current time truncated to the stored millisecond precision, so a
/// record read back compares equal to the one returned on write.
fn utc_now_ms() -> DateTime<Utc> {
    let ms = Utc::now().timestamp_millis();
    Utc.timestamp_millis_opt(ms).single().unwrap_or_else(Utc::now)
}

fn datetime_from_ms(ms: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| StoreError::serialization(format!("timestamp out of range: {ms}")))
}

/// WHERE clause plus its positional i64 parameters for a filter.
fn where_clause(filter: TaskFilter, today: DayWindow) -> (&'static str, Vec<i64>) {
    match filter {
        TaskFilter::All => ("", Vec::new()),
        TaskFilter::Incomplete => ("WHERE completed = 0", Vec::new()),
        TaskFilter::Complete => ("WHERE completed = 1", Vec::new()),
        TaskFilter::Today => (
            "WHERE due_date_ms IS NOT NULL AND due_date_ms BETWEEN ? AND ?",
            vec![today.start.timestamp_millis(), today.end.timestamp_millis()],
        ),
    }
}

type TaskRow = (String, String, i64, Option<i64>, i64, i64);

fn task_from_row(row: TaskRow) -> StoreResult<Task> {
    let (id, title, completed, due_ms, created_ms, updated_ms) = row;
    Ok(Task {
        id: TaskId::parse(&id).map_err(StoreError::serialization)?,
        title,
        completed: completed != 0,
        due_date: due_ms.map(datetime_from_ms).transpose()?,
        created_at: datetime_from_ms(created_ms)?,
        updated_at: datetime_from_ms(updated_ms)?,
    })
}

fn select_by_id(conn: &Connection, id: &TaskId) -> StoreResult<Option<Task>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, completed, due_date_ms, created_at_ms, updated_at_ms
             FROM tasks WHERE id = ?",
        )
        .map_err(StoreError::backend)?;
    let mut rows = stmt
        .query_map([id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Option<i64>>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, i64>(5)?,
            ))
        })
        .map_err(StoreError::backend)?;

    match rows.next() {
        Some(row) => Ok(Some(task_from_row(row.map_err(StoreError::backend)?)?)),
        None => Ok(None),
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn insert(&self, draft: NewTask) -> StoreResult<Task> {
        self.with_conn(move |conn| {
            let now = utc_now_ms();
            let task = Task {
                id: TaskId::generate(),
                title: draft.title,
                completed: false,
                due_date: draft.due_date,
                created_at: now,
                updated_at: now,
            };

            conn.execute(
                "INSERT INTO tasks (id, title, completed, due_date_ms, created_at_ms, updated_at_ms)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    task.id.as_str(),
                    task.title,
                    task.completed as i64,
                    task.due_date.map(|d| d.timestamp_millis()),
                    task.created_at.timestamp_millis(),
                    task.updated_at.timestamp_millis(),
                ],
            )
            .map_err(StoreError::backend)?;

            tracing::debug!(task_id = %task.id, "Inserted task");
            Ok(task)
        })
        .await
    }

    async fn find(&self, query: TaskQuery, today: DayWindow) -> StoreResult<Vec<Task>> {
        self.with_conn(move |conn| {
            let (clause, mut params) = where_clause(query.filter, today);
            let sql = format!(
                "SELECT id, title, completed, due_date_ms, created_at_ms, updated_at_ms
                 FROM tasks {clause} {ORDER_CLAUSE} LIMIT ? OFFSET ?"
            );
            // SQLite treats LIMIT -1 as "no limit".
            let limit = i64::try_from(query.limit).unwrap_or(-1);
            let skip = i64::try_from(query.skip).unwrap_or(i64::MAX);
            params.push(limit);
            params.push(skip);

            let mut stmt = conn.prepare(&sql).map_err(StoreError::backend)?;
            let rows = stmt
                .query_map(params_from_iter(params), |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                        row.get::<_, i64>(4)?,
                        row.get::<_, i64>(5)?,
                    ))
                })
                .map_err(StoreError::backend)?;

            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(task_from_row(row.map_err(StoreError::backend)?)?);
            }
            Ok(tasks)
        })
        .await
    }

    async fn count(&self, filter: TaskFilter, today: DayWindow) -> StoreResult<usize> {
        self.with_conn(move |conn| {
            let (clause, params) = where_clause(filter, today);
            let sql = format!("SELECT COUNT(*) FROM tasks {clause}");
            let count: i64 = conn
                .query_row(&sql, params_from_iter(params), |row| row.get(0))
                .map_err(StoreError::backend)?;
            Ok(count.max(0) as usize)
        })
        .await
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let tx = conn.transaction().map_err(StoreError::backend)?;

            let Some(current) = select_by_id(&tx, &id)? else {
                return Ok(None);
            };
            let updated = patch.apply(&current, utc_now_ms());

            tx.execute(
                "UPDATE tasks
                 SET title = ?1, completed = ?2, due_date_ms = ?3, updated_at_ms = ?4
                 WHERE id = ?5",
                rusqlite::params![
                    updated.title,
                    updated.completed as i64,
                    updated.due_date.map(|d| d.timestamp_millis()),
                    updated.updated_at.timestamp_millis(),
                    id.as_str(),
                ],
            )
            .map_err(StoreError::backend)?;
            tx.commit().map_err(StoreError::backend)?;

            tracing::debug!(task_id = %id, "Updated task");
            Ok(Some(updated))
        })
        .await
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<bool> {
        let id = id.clone();
        self.with_conn(move |conn| {
            let removed = conn
                .execute("DELETE FROM tasks WHERE id = ?", [id.as_str()])
                .map_err(StoreError::backend)?;
            if removed > 0 {
                tracing::debug!(task_id = %id, "Deleted task");
            }
            Ok(removed > 0)
        })
        .await
    }
}
