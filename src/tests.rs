use std::path::PathBuf;

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rocket::figment::util::map;
use rocket::figment::value::{Map, Value};
use rocket::http::{ContentType, Status};
use rocket::local::blocking::Client;
use tempfile::TempDir;

use crate::models::Todo;
use crate::store;

struct Harness {
    client: Client,
    db_path: PathBuf,
    _dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("todo.db");

        let db: Map<_, Value> = map! {
            "url" => db_path.display().to_string().into(),
        };
        let figment = rocket::Config::figment()
            .merge(("databases", map!["todo_db" => db]))
            .merge(("app_name", "Test Todos"));

        let client = Client::tracked(super::build(figment)).expect("valid rocket instance");
        Harness { client, db_path, _dir: dir }
    }

    fn conn(&self) -> SqliteConnection {
        SqliteConnection::establish(&self.db_path.display().to_string()).expect("side connection")
    }

    fn todos(&self) -> Vec<Todo> {
        store::list_all(&mut self.conn()).expect("list todos")
    }

    fn add(&self, body: &str) -> Status {
        let response = self.client.post("/add").header(ContentType::Form).body(body).dispatch();
        assert_eq!(response.headers().get_one("Location"), Some("/"));
        response.status()
    }

    fn get(&self, uri: &str) -> (Status, String) {
        let response = self.client.get(uri.to_string()).dispatch();
        let status = response.status();
        (status, response.into_string().unwrap_or_default())
    }
}

#[test]
fn index_renders_empty_list() {
    let h = Harness::new();
    let (status, body) = h.get("/");

    assert_eq!(status, Status::Ok);
    assert!(body.contains("<title>Test Todos</title>"));
    assert!(body.contains("No todos yet."));
}

#[test]
fn add_persists_and_flashes_once() {
    let h = Harness::new();

    assert_eq!(h.add("title=Buy+milk&description=2%25"), Status::SeeOther);

    let todos = h.todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy milk");
    assert_eq!(todos[0].description.as_deref(), Some("2%"));
    assert!(!todos[0].completed);

    let (_, body) = h.get("/");
    assert!(body.contains(r#"class="status success""#));
    assert!(body.contains("Todo added successfully!"));
    assert!(body.contains("Buy milk"));

    let (_, body) = h.get("/");
    assert!(!body.contains("Todo added successfully!"));
    assert!(body.contains("Buy milk"));
}

#[test]
fn add_without_title_writes_nothing() {
    let h = Harness::new();

    for body in ["title=&description=orphan", "description=orphan", "title=+++"] {
        h.add(body);

        let (_, page) = h.get("/");
        assert!(page.contains(r#"class="status error""#));
        assert!(page.contains("Title is required!"));
    }

    assert!(h.todos().is_empty());
}

#[test]
fn add_with_overlong_title_writes_nothing() {
    let h = Harness::new();
    h.add(&format!("title={}", "x".repeat(101)));

    let (_, page) = h.get("/");
    assert!(page.contains("Title must be at most 100 characters!"));
    assert!(h.todos().is_empty());
}

#[test]
fn user_text_is_escaped() {
    let h = Harness::new();
    h.add("title=%3Cscript%3Ealert(1)%3C%2Fscript%3E&description=%3Cb%3Ebold%3C%2Fb%3E");

    let (_, body) = h.get("/");
    assert!(!body.contains("<script>alert(1)"));
    assert!(!body.contains("<b>bold"));
    assert!(body.contains("&lt;script&gt;alert(1)"));
    assert!(body.contains("&lt;b&gt;bold"));
}

#[test]
fn toggle_twice_restores_original_state() {
    let h = Harness::new();
    h.add("title=Walk+dog");
    let id = h.todos()[0].id;

    let response = h.client.get(format!("/complete/{}", id)).dispatch();
    assert_eq!(response.status(), Status::SeeOther);
    assert!(h.todos()[0].completed);

    let (_, body) = h.get("/");
    assert!(body.contains("Todo updated!"));

    h.client.get(format!("/complete/{}", id)).dispatch();
    assert!(!h.todos()[0].completed);
}

#[test]
fn unknown_ids_are_404_and_change_nothing() {
    let h = Harness::new();
    h.add("title=Keep+me");
    let before = h.todos();

    let (status, body) = h.get("/complete/999");
    assert_eq!(status, Status::NotFound);
    assert!(body.contains("404"));

    let (status, _) = h.get("/delete/999");
    assert_eq!(status, Status::NotFound);

    assert_eq!(h.todos(), before);
}

#[test]
fn malformed_ids_are_404_and_change_nothing() {
    let h = Harness::new();
    h.add("title=Keep+me");
    let before = h.todos();

    for uri in ["/complete/abc", "/delete/abc", "/complete/99999999999", "/delete/99999999999"] {
        let (status, body) = h.get(uri);
        assert_eq!(status, Status::NotFound, "{}", uri);
        assert!(body.contains("404: Not Found"), "{}", uri);
    }

    assert_eq!(h.todos(), before);
}

#[test]
fn storage_failure_renders_500_page() {
    let h = Harness::new();
    diesel::sql_query("DROP TABLE todos")
        .execute(&mut h.conn())
        .expect("drop table");

    let (status, body) = h.get("/");
    assert_eq!(status, Status::InternalServerError);
    assert!(body.contains("500: Internal Server Error"));
}

#[test]
fn delete_removes_row_and_id_is_not_reused() {
    let h = Harness::new();
    h.add("title=Temporary");
    let id = h.todos()[0].id;

    let response = h.client.get(format!("/delete/{}", id)).dispatch();
    assert_eq!(response.status(), Status::SeeOther);

    let (_, body) = h.get("/");
    assert!(body.contains("Todo deleted!"));
    assert!(matches!(
        store::get_by_id(&mut h.conn(), id),
        Err(crate::error::Error::NotFound(_))
    ));

    h.add("title=Replacement");
    assert!(h.todos()[0].id > id);
}

#[test]
fn walkthrough() {
    let h = Harness::new();

    h.add("title=Walk+dog&description=");
    h.add("title=Pay+bills&description=Due+Friday");

    let todos = h.todos();
    let titles: Vec<_> = todos.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Pay bills", "Walk dog"]);
    let (pay_bills, walk_dog) = (todos[0].id, todos[1].id);

    h.get(&format!("/complete/{}", walk_dog));
    assert!(h.todos()[1].completed);

    h.get(&format!("/delete/{}", pay_bills));
    let todos = h.todos();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Walk dog");
    assert!(todos[0].completed);
}
