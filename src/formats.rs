pub mod config;
mod json;
pub mod scene;

pub use json::JsonError;
