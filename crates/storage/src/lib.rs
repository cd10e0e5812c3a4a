#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod changes;
mod models;
mod schema;
mod sqlite;

pub use changes::{Revisions, Table, Watch};
pub use models::RowError;
pub use sqlite::{SqlitePool, SqliteStore};
