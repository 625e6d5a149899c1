pub mod auth;
pub mod config;
pub mod db;
pub mod profile;
pub mod screens;
pub mod state;
pub mod storage;
pub mod terminal;
