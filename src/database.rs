/*!
 * 数据库操作模块
 *
 * 持有进程内唯一的 SQLite 连接池，并提供 `todos` 表的原始 SQL 操作。
 * 这里的函数直接返回 `sqlx::Error`，由服务层负责翻译为应用错误。
 */

use crate::error::AppResult;
use crate::models::{Todo, UpdateTodoRequest};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::str::FromStr;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Database { pool })
    }

    pub async fn new_with_migrations(database_url: &str) -> AppResult<Self> {
        let db = Database::new(database_url).await?;
        db.migrate().await?;
        Ok(db)
    }

    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// 关闭连接池，等待所有连接归还
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ---------------------------------------------------------------------
    // Todo 管理
    // ---------------------------------------------------------------------

    pub async fn insert_todo(&self, title: &str) -> Result<Todo, sqlx::Error> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO todos (title, completed, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(title)
        .bind(false)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(Todo {
            id: result.last_insert_rowid(),
            title: title.to_string(),
            completed: false,
            created_at: now,
        })
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, completed, created_at
            FROM todos
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_todo(&self, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, completed, created_at
            FROM todos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// 只更新请求中出现的字段；调用方需保证至少有一个字段
    pub async fn update_todo(
        &self,
        id: i64,
        changes: &UpdateTodoRequest,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let mut query_builder = QueryBuilder::<Sqlite>::new("UPDATE todos SET ");
        let mut fields = query_builder.separated(", ");

        if let Some(title) = &changes.title {
            fields.push("title = ").push_bind_unseparated(title.as_str());
        }

        if let Some(completed) = changes.completed {
            fields.push("completed = ").push_bind_unseparated(completed);
        }

        query_builder.push(" WHERE id = ").push_bind(id);

        let result = query_builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_todo(id).await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 表中的行数，供测试确认没有发生写入
    pub async fn count_todos(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM todos")
            .fetch_one(&self.pool)
            .await
    }
}
