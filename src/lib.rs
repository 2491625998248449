pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod resolver;
pub mod ui;
pub mod utils;
