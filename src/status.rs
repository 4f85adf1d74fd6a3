//! One-shot status messages shown on the page after a redirect.
//!
//! The message rides on the redirect as a `Flash` cookie and is cleared by
//! the `FlashMessage` guard once the next page reads it.

use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Success,
    Error,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Success => "success",
            Category::Error => "error",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub category: Category,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        StatusMessage { category: Category::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        StatusMessage { category: Category::Error, text: text.into() }
    }

    /// Attaches the message to a redirect.
    pub fn redirect(self, to: Redirect) -> Flash<Redirect> {
        Flash::new(to, self.category.as_str(), self.text)
    }
}

impl From<FlashMessage<'_>> for StatusMessage {
    fn from(flash: FlashMessage<'_>) -> Self {
        let category = match flash.kind() {
            "error" => Category::Error,
            _ => Category::Success,
        };
        StatusMessage { category, text: flash.message().to_owned() }
    }
}
