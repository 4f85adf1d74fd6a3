use chrono::{NaiveDateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use serde::Serialize;

use crate::schema::todos;

/// Column width of `todos.title`.
pub const TITLE_MAX_LEN: usize = 100;

#[derive(Serialize, Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = todos)]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl Todo {
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = todos)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        NewTodo {
            title: title.into(),
            description,
            completed: false,
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// Body of `POST /add`. Both fields are optional at the wire level so a
/// missing title is reported as a status message rather than a 422.
#[derive(FromForm, Debug, Default)]
pub struct TodoForm {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingTitle,
    TitleTooLong,
}

impl FormError {
    pub fn message(self) -> &'static str {
        match self {
            FormError::MissingTitle => "Title is required!",
            FormError::TitleTooLong => "Title must be at most 100 characters!",
        }
    }
}

impl TodoForm {
    pub fn validate(self) -> Result<NewTodo, FormError> {
        let title = self
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .ok_or(FormError::MissingTitle)?;

        if title.chars().count() > TITLE_MAX_LEN {
            return Err(FormError::TitleTooLong);
        }

        let description = self
            .description
            .map(|d| d.trim().to_owned())
            .filter(|d| !d.is_empty());

        Ok(NewTodo::new(title, description))
    }
}
