pub mod exercise;
pub mod user;

use rusqlite::Row;

pub use exercise::{CreateExercise, Exercise, LogFilter, LogQuery, NewExercise};
pub use user::{CreateUser, User};

/// Maps a `SELECT *` row of the model's table.
pub trait FromSqliteRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}
