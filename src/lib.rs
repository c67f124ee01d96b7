pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod infrastructure;
pub mod store;
pub mod ui;
pub mod window;
