/*!
 * Todo 业务服务
 *
 * 服务层是底层持久化错误到应用错误的唯一翻译点：
 * - 约束冲突 → `AppError::Conflict`（409）
 * - 其他持久化失败 → `AppError::Internal`（500，消息不含底层细节）
 * - 按 id 查询不到 → `AppError::NotFound`（404）
 *
 * 针对某个 id 的更新和删除都会先重新读取该行，保证"未找到"的判断一致。
 */

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Todo, UpdateTodoRequest};
use tracing::{error, info};

pub const TODO_NOT_FOUND: &str = "Todo Not Found";

/// 是否为已知的约束类失败（唯一、外键、检查、非空）
pub fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation()
                || db_err.is_foreign_key_violation()
                || db_err.is_check_violation()
                || matches!(db_err.kind(), sqlx::error::ErrorKind::NotNullViolation)
        }
        _ => false,
    }
}

#[derive(Clone)]
pub struct TodoService {
    db: Database,
}

impl TodoService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 底层数据库句柄，供测试检查表状态
    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn create_todo(&self, title: &str) -> AppResult<Todo> {
        match self.db.insert_todo(title).await {
            Ok(todo) => {
                info!(todo_id = todo.id, "Todo created");
                Ok(todo)
            }
            Err(err) if is_constraint_violation(&err) => {
                error!("Constraint violation while creating todo: {}", err);
                Err(AppError::Conflict(
                    "Unable to create todo due to a data conflict".to_string(),
                ))
            }
            Err(err) => {
                error!("Failed to create todo: {}", err);
                Err(AppError::Internal("Failed to Create Todo".to_string()))
            }
        }
    }

    pub async fn get_todos(&self) -> AppResult<Vec<Todo>> {
        self.db.list_todos().await.map_err(|err| {
            error!("Failed to fetch todos: {}", err);
            if is_constraint_violation(&err) {
                AppError::Conflict("Unable to fetch todos due to a data conflict".to_string())
            } else {
                AppError::Internal("Failed to fetch todos".to_string())
            }
        })
    }

    /// 查询不到时返回 `NotFound`；其他数据库失败原样向上传播
    pub async fn get_todo_by_id(&self, id: i64) -> AppResult<Todo> {
        self.db
            .find_todo(id)
            .await?
            .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.to_string()))
    }

    pub async fn update_todo(&self, id: i64, changes: &UpdateTodoRequest) -> AppResult<Todo> {
        let existing = self.get_todo_by_id(id).await?;

        if changes.is_empty() {
            return Ok(existing);
        }

        match self.db.update_todo(id, changes).await {
            Ok(Some(todo)) => {
                info!(todo_id = id, "Todo updated");
                Ok(todo)
            }
            // 行在读取之后被并发删除
            Ok(None) => Err(AppError::NotFound(TODO_NOT_FOUND.to_string())),
            Err(err) => {
                error!(todo_id = id, "Failed to update todo: {}", err);
                Err(AppError::Internal("Failed to update todo".to_string()))
            }
        }
    }

    pub async fn delete_todo(&self, id: i64) -> AppResult<()> {
        self.get_todo_by_id(id).await?;

        match self.db.delete_todo(id).await {
            Ok(true) => {
                info!(todo_id = id, "Todo deleted");
                Ok(())
            }
            // 行在读取之后被并发删除
            Ok(false) => Err(AppError::NotFound(TODO_NOT_FOUND.to_string())),
            Err(err) => {
                error!(todo_id = id, "Failed to delete todo: {}", err);
                Err(AppError::Internal("Failed to delete todo".to_string()))
            }
        }
    }
}
