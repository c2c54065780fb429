#[macro_use]
extern crate rocket;

pub mod access;
pub mod cache;
pub mod catchers;
pub mod configuration;
pub mod domain;
pub mod guards;
pub mod migrations;
pub mod models;
pub mod port_saver;
pub mod queries;
pub mod routes;
pub mod schema;
pub mod startup;
pub mod telemetry;
pub mod views;
