use serde::{Deserialize, Serialize};

use crate::notes::repo::Note;

#[derive(Debug, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub done: bool,
}

/// All fields optional; only the present ones change.
#[derive(Debug, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub done: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct NoteOut {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub done: bool,
}

impl From<Note> for NoteOut {
    fn from(n: Note) -> Self {
        Self {
            id: n.id,
            title: n.title,
            body: n.body,
            done: n.done,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
