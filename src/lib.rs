pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod quality;
pub mod table;
pub mod transmission;
pub mod yts;

pub use error::{Error, Result};
