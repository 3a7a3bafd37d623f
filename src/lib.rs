pub mod config;
pub mod form;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
