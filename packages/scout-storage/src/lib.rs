pub mod boards;
pub mod db;
pub mod history;
pub mod index;
pub mod models;
pub mod schema;

mod error;
mod sql;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
