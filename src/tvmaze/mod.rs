//! TVMaze search API client and payload model.

pub mod api;
pub mod errors;
pub mod json;
pub mod models;

pub use api::TvMazeApi;
pub use errors::TvMazeError;
pub use json::parse_json_with_context;
pub use models::*;
