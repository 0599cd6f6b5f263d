//! HTTP surface of the search proxy.

pub mod error;
mod health;
pub mod middleware;
pub mod proxy;
pub mod routes;
mod search;

pub use routes::*;
