use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

/// Longest title accepted, counted in characters after trimming.
pub const MAX_TITLE_CHARS: usize = 200;

/// Rejections raised while turning a request into a todo command.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required and must be under 200 characters")]
    InvalidTitle,
    #[error("Completed must be a boolean")]
    InvalidCompleted,
    #[error("Provide title or completed to update")]
    NothingToUpdate,
    #[error("Invalid todo id")]
    InvalidId,
    /// The body was not a JSON document of the expected shape.
    #[error("{0}")]
    MalformedBody(String),
}

/// A trimmed, non-empty title of at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().count() > MAX_TITLE_CHARS {
            return Err(ValidationError::InvalidTitle);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A validated create command.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: Title,
}

/// A validated partial update. At least one field is present.
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub title: Option<Title>,
    pub completed: Option<bool>,
}

/// JSON body of `POST /api/todos`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateTodoRequest {
    /// Title of the new todo
    #[serde(default)]
    pub title: Option<String>,
}

impl TryFrom<CreateTodoRequest> for NewTodo {
    type Error = ValidationError;

    fn try_from(request: CreateTodoRequest) -> Result<Self, Self::Error> {
        let title = request.title.ok_or(ValidationError::InvalidTitle)?;
        Ok(Self {
            title: Title::parse(&title)?,
        })
    }
}

/// JSON body of `PATCH /api/todos/{id}`.
///
/// The outer `Option` records whether the key was sent at all, the inner one
/// whether it was `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTodoRequest {
    /// New title for the todo
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    /// New completion flag
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Option<bool>>,
}

impl TryFrom<UpdateTodoRequest> for TodoChanges {
    type Error = ValidationError;

    fn try_from(request: UpdateTodoRequest) -> Result<Self, Self::Error> {
        if request.title.is_none() && request.completed.is_none() {
            return Err(ValidationError::NothingToUpdate);
        }

        let title = match request.title {
            Some(Some(title)) => Some(Title::parse(&title)?),
            Some(None) => return Err(ValidationError::InvalidTitle),
            None => None,
        };
        let completed = match request.completed {
            Some(Some(completed)) => Some(completed),
            Some(None) => return Err(ValidationError::InvalidCompleted),
            None => None,
        };

        Ok(Self { title, completed })
    }
}

/// Parses the `{id}` path segment.
///
/// Any integral number is a valid id, including decimal (`1.0`) and exponent
/// (`1e3`) spellings. `Ok(None)` is an integer the store could never have
/// assigned, so no row can match it.
pub fn parse_todo_id(raw: &str) -> Result<Option<i32>, ValidationError> {
    let raw = raw.trim();
    if let Ok(id) = raw.parse::<i64>() {
        return Ok(i32::try_from(id).ok());
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => {
            let in_range = (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&value);
            Ok(in_range.then_some(value as i32))
        }
        _ => Err(ValidationError::InvalidId),
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
