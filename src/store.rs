//! Storage layer for the `todos` table.
//!
//! Every function takes a plain `&mut SqliteConnection` so handlers can call
//! them from inside `Db::run` and tests can call them on their own
//! connection. Mutations each run in their own transaction.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::{Error, Result};
use crate::models::{NewTodo, Todo};
use crate::schema::todos;

/// All todos, newest first.
pub fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Todo>> {
    let rows = todos::table
        .order((todos::created_at.desc(), todos::id.desc()))
        .select(Todo::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn get_by_id(conn: &mut SqliteConnection, id: i32) -> Result<Todo> {
    todos::table
        .find(id)
        .select(Todo::as_select())
        .first(conn)
        .optional()?
        .ok_or(Error::NotFound(id))
}

pub fn insert(conn: &mut SqliteConnection, new: &NewTodo) -> Result<Todo> {
    conn.transaction(|c| {
        diesel::insert_into(todos::table).values(new).execute(c)?;
        // AUTOINCREMENT ids only grow, so the largest id is the row just written.
        let todo = todos::table
            .order(todos::id.desc())
            .select(Todo::as_select())
            .first(c)?;
        Ok(todo)
    })
}

/// Persists the mutable columns of `todo`. `created_at` is never written.
pub fn update(conn: &mut SqliteConnection, todo: &Todo) -> Result<()> {
    conn.transaction(|c| {
        let n = diesel::update(todos::table.find(todo.id))
            .set((
                todos::title.eq(&todo.title),
                todos::description.eq(&todo.description),
                todos::completed.eq(todo.completed),
            ))
            .execute(c)?;
        if n == 0 {
            return Err(Error::NotFound(todo.id));
        }
        Ok(())
    })
}

pub fn delete(conn: &mut SqliteConnection, id: i32) -> Result<()> {
    conn.transaction(|c| {
        let n = diesel::delete(todos::table.find(id)).execute(c)?;
        if n == 0 {
            return Err(Error::NotFound(id));
        }
        Ok(())
    })
}
