pub mod config;
pub mod dates;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod version;
