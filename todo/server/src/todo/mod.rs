use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub mod api;
pub mod request;

pub use request::{NewTodo, Title, TodoChanges, ValidationError};

/// A single task record as returned by the API.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, ToSchema)]
pub struct Todo {
    /// Store-assigned identifier, strictly increasing
    pub id: i32,
    /// Trimmed title, 1 to 200 characters
    pub title: String,
    /// Whether the task is done
    pub completed: bool,
    /// Creation time, set once by the store
    pub created_at: DateTime<Utc>,
}

impl From<todos::Model> for Todo {
    fn from(model: todos::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            completed: model.completed,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Shared handle to the connection pool, injected into every handler.
#[derive(Clone, Debug)]
pub struct TodoState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// Error type for TodoService operations.
#[derive(Debug, thiserror::Error)]
pub enum TodoServiceError {
    /// No row matched the given id.
    #[error("Todo with ID {0} not found")]
    TodoNotFound(i32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct TodoService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TodoService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TodoService<'_> {
        TodoService { db }
    }

    /// Checks that the store answers queries.
    #[tracing::instrument(skip(self))]
    pub async fn ping(&self) -> Result<(), TodoServiceError> {
        self.db.ping().await?;
        Ok(())
    }

    /// Retrieves all todos, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn get_all_todos(&self) -> Result<Vec<Todo>, TodoServiceError> {
        let todos = todos::Entity::find()
            .order_by_desc(todos::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Todo::from)
            .collect();
        Ok(todos)
    }

    /// Inserts a new todo. The store assigns `id`, `completed` and `created_at`.
    #[tracing::instrument(skip(self))]
    pub async fn create_todo(&self, new_todo: NewTodo) -> Result<Todo, TodoServiceError> {
        let active_model = todos::ActiveModel {
            title: ActiveValue::Set(new_todo.title.into_inner()),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Todo::from(created_model))
    }

    /// Applies the provided fields to the todo with the given ID in a single
    /// `UPDATE ... RETURNING` statement.
    ///
    /// # Returns
    ///
    /// The updated `Todo`, or `TodoServiceError::TodoNotFound` if no row matched.
    #[tracing::instrument(skip(self))]
    pub async fn update_todo(
        &self,
        id: i32,
        changes: TodoChanges,
    ) -> Result<Todo, TodoServiceError> {
        let mut active_model = todos::ActiveModel {
            id: ActiveValue::Unchanged(id),
            ..Default::default()
        };
        if let Some(title) = changes.title {
            active_model.title = ActiveValue::Set(title.into_inner());
        }
        if let Some(completed) = changes.completed {
            active_model.completed = ActiveValue::Set(completed);
        }

        match active_model.update(self.db).await {
            Ok(updated_model) => Ok(Todo::from(updated_model)),
            Err(DbErr::RecordNotUpdated) => Err(TodoServiceError::TodoNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes the todo with the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_todo(&self, id: i32) -> Result<(), TodoServiceError> {
        let result = todos::Entity::delete_by_id(id).exec(self.db).await?;
        if result.rows_affected == 0 {
            return Err(TodoServiceError::TodoNotFound(id));
        }
        Ok(())
    }
}
