pub mod app;
pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod state;
pub mod store;
pub mod tvmaze;
pub mod utils;
pub mod web;
