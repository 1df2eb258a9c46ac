use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{migrate::MigrateDatabase, Row};
use std::path::Path;
use tracing::{debug, info};

use super::{StorageError, StorageResult, TaskStore};
use crate::query::{self, TaskQuery};
use crate::types::{Task, TaskPriority, TaskStatus};

/// SQLite implementation of [`TaskStore`].
///
/// Filters, default ordering, counting, and pagination are pushed down as
/// query clauses. The one exception is the regex search, which SQLite cannot
/// evaluate natively: when a pattern is present the candidates are narrowed
/// with the indexed filters and the shared query pipeline finishes the job,
/// so both backends stay observably identical.
pub struct SqliteTaskStore {
    pool: SqlitePool,
}

impl SqliteTaskStore {
    /// Opens (and creates, if missing) the database file at `path`
    pub async fn connect(path: &Path, max_connections: u32) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
            }
        }

        let database_url = format!("sqlite:{}", path.display());

        if !sqlx::Sqlite::database_exists(&database_url)
            .await
            .map_err(StorageError::Sqlx)?
        {
            debug!("Creating database at: {}", database_url);
            sqlx::Sqlite::create_database(&database_url)
                .await
                .map_err(StorageError::Sqlx)?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&database_url)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA journal_mode = WAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA foreign_keys = ON")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        sqlx::query("PRAGMA synchronous = NORMAL")
            .execute(&pool)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(Self { pool })
    }

    /// Wraps an existing pool (used by tests and embedders)
    pub fn with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &SqliteRow) -> StorageResult<Task> {
        let status_str: String = row.try_get("status")?;
        let status = status_str
            .parse::<TaskStatus>()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let priority_raw: i64 = row.try_get("priority")?;
        let priority = u8::try_from(priority_raw)
            .ok()
            .and_then(|value| TaskPriority::try_from(value).ok())
            .ok_or_else(|| {
                StorageError::Database(format!("Invalid priority value: {}", priority_raw))
            })?;

        Ok(Task {
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            status,
            priority,
        })
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn initialize(&self) -> StorageResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                title       VARCHAR(50) NOT NULL UNIQUE,
                description TEXT NOT NULL,
                status      TEXT NOT NULL DEFAULT 'pending',
                priority    INTEGER NOT NULL DEFAULT 1,
                created_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at  TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        info!("SQLite task storage initialized");
        Ok(())
    }

    async fn create_task(&self, task: Task) -> StorageResult<Task> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, status, priority, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_u8() as i64)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                tx.commit().await.map_err(StorageError::Sqlx)?;
                debug!("Created task '{}'", task.title);
                self.get_task_by_title(&task.title)
                    .await?
                    .ok_or_else(|| StorageError::Database("Task missing after insert".to_string()))
            }
            Err(sqlx::Error::Database(db_err)) => {
                // Transaction rolls back on drop. SQLITE_CONSTRAINT_UNIQUE
                // carries code 2067 (or 1555 for the primary key).
                if let Some(code) = db_err.code() {
                    if code == "2067" || code == "1555" {
                        return Err(StorageError::DuplicateTitle(task.title));
                    }
                }
                Err(StorageError::Sqlx(sqlx::Error::Database(db_err)))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    async fn get_task_by_title(&self, title: &str) -> StorageResult<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => Ok(Some(Self::row_to_task(&row)?)),
            None => Ok(None),
        }
    }

    async fn query_tasks(&self, query: &TaskQuery) -> StorageResult<(Vec<Task>, usize)> {
        let mut where_conditions: Vec<&str> = Vec::new();
        if query.status.is_some() {
            where_conditions.push("status = ?");
        }
        if query.priority.is_some() {
            where_conditions.push("priority = ?");
        }

        let where_clause = if where_conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", where_conditions.join(" AND "))
        };

        if let Some(pattern) = &query.search {
            // No native regex operator; narrow with the indexed filters and
            // let the shared pipeline apply the remaining steps.
            debug!("Evaluating search pattern '{}' in memory", pattern.as_str());
            let query_str = format!("SELECT * FROM tasks {} ORDER BY id ASC", where_clause);

            let mut rows_query = sqlx::query(&query_str);
            if let Some(status) = &query.status {
                rows_query = rows_query.bind(status.as_str());
            }
            if let Some(priority) = &query.priority {
                rows_query = rows_query.bind(priority.as_u8() as i64);
            }

            let rows = rows_query
                .fetch_all(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

            let mut tasks = Vec::new();
            for row in rows {
                tasks.push(Self::row_to_task(&row)?);
            }

            return Ok(query::execute(tasks, query));
        }

        // Get total count before applying pagination
        let count_str = format!("SELECT COUNT(*) FROM tasks {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_str);
        if let Some(status) = &query.status {
            count_query = count_query.bind(status.as_str());
        }
        if let Some(priority) = &query.priority {
            count_query = count_query.bind(priority.as_u8() as i64);
        }
        let total = count_query
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        // The secondary id key matches the stable tie-breaking of the
        // in-memory pipeline; without a sort field, id is creation order.
        let order_clause = match query.sort_by {
            Some(field) => {
                let direction = if query.sort_order.is_descending() {
                    "DESC"
                } else {
                    "ASC"
                };
                format!("ORDER BY {} {}, id ASC", field.column(), direction)
            }
            None => "ORDER BY id ASC".to_string(),
        };

        // LIMIT -1 means no cap in SQLite but still allows an OFFSET
        let limit_clause = match query.limit {
            Some(limit) => format!("LIMIT {} OFFSET {}", limit, query.skip),
            None => format!("LIMIT -1 OFFSET {}", query.skip),
        };

        let query_str = format!(
            "SELECT * FROM tasks {} {} {}",
            where_clause, order_clause, limit_clause
        );

        let mut rows_query = sqlx::query(&query_str);
        if let Some(status) = &query.status {
            rows_query = rows_query.bind(status.as_str());
        }
        if let Some(priority) = &query.priority {
            rows_query = rows_query.bind(priority.as_u8() as i64);
        }

        let rows = rows_query
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(Self::row_to_task(&row)?);
        }

        Ok((tasks, total as usize))
    }

    async fn update_task(&self, title: &str, task: Task) -> StorageResult<Option<Task>> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET description = ?, status = ?, priority = ?, updated_at = ?
            WHERE title = ?
            "#,
        )
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.priority.as_u8() as i64)
        .bind(now)
        .bind(title)
        .execute(&mut *tx)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;
        debug!("Updated task '{}'", title);
        self.get_task_by_title(title).await
    }

    async fn delete_task(&self, title: &str) -> StorageResult<bool> {
        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM tasks WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;
        debug!("Deleted task '{}'", title);
        Ok(true)
    }
}
