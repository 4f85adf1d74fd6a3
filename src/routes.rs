use rocket::form::Form;
use rocket::request::FlashMessage;
use rocket::Request;
use rocket::response::{Flash, Redirect};
use rocket::State;
use rocket_dyn_templates::{context, Template};

use crate::error::{Error, Result};
use crate::models::TodoForm;
use crate::status::StatusMessage;
use crate::{store, AppConfig, Db};

#[get("/")]
pub async fn index(
    connection: Db,
    config: &State<AppConfig>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template> {
    let todos = connection.run(|c| store::list_all(c)).await?;
    let status = flash.map(StatusMessage::from);

    Ok(Template::render(
        "index",
        context! {
            app_name: &config.app_name,
            todos,
            status,
        },
    ))
}

#[post("/add", data = "<form>")]
pub async fn add(connection: Db, form: Form<TodoForm>) -> Result<Flash<Redirect>> {
    let new = match form.into_inner().validate() {
        Ok(new) => new,
        Err(e) => return Ok(StatusMessage::error(e.message()).redirect(Redirect::to(uri!(index)))),
    };

    let todo = connection.run(move |c| store::insert(c, &new)).await?;
    log::info!("added todo {} ({:?})", todo.id, todo.title);

    Ok(StatusMessage::success("Todo added successfully!").redirect(Redirect::to(uri!(index))))
}

/// Ids that do not parse as an `i32` can never name a row.
fn parsed_id(id: Option<i32>) -> Result<i32> {
    id.ok_or(Error::MalformedId)
}

#[get("/complete/<id>")]
pub async fn complete(connection: Db, id: Option<i32>) -> Result<Flash<Redirect>> {
    let id = parsed_id(id)?;
    let todo = connection
        .run(move |c| {
            let mut todo = store::get_by_id(c, id)?;
            todo.toggle();
            store::update(c, &todo)?;
            Ok::<_, Error>(todo)
        })
        .await?;
    log::info!("todo {} completed={}", todo.id, todo.completed);

    Ok(StatusMessage::success("Todo updated!").redirect(Redirect::to(uri!(index))))
}

#[get("/delete/<id>")]
pub async fn delete(connection: Db, id: Option<i32>) -> Result<Flash<Redirect>> {
    let id = parsed_id(id)?;
    connection
        .run(move |c| {
            store::get_by_id(c, id)?;
            store::delete(c, id)
        })
        .await?;
    log::info!("deleted todo {}", id);

    Ok(StatusMessage::success("Todo deleted!").redirect(Redirect::to(uri!(index))))
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Template {
    Template::render("error/404", context! { uri: req.uri().to_string() })
}

#[catch(500)]
pub fn internal_error() -> Template {
    Template::render("error/500", context! {})
}
