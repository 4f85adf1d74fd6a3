use rocket::http::Status;
use rocket::Request;
use rocket::response::{self, Responder};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("todo {0} not found")]
    NotFound(i32),
    #[error("todo id is not an integer")]
    MalformedId,
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Error::NotFound(id) => {
                log::debug!("todo {} not found", id);
                Err(Status::NotFound)
            }
            Error::MalformedId => Err(Status::NotFound),
            Error::Database(e) => {
                log::error!("database error: {}", e);
                Err(Status::InternalServerError)
            }
        }
    }
}
