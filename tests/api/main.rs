mod admin;
mod auth;
mod helpers;
mod migrate_cli;
mod migrations;
mod school;
mod student;
