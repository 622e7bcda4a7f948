pub mod actions;
pub mod auth;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod registrations;
pub mod routes;
pub mod state;
pub mod storage;
pub mod store;
pub mod utils;
