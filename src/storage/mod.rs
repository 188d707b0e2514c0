pub mod sqlite;

pub use sqlite::{ScoreRecord, Storage};
