pub mod app;
pub mod backend;
pub mod config;
pub mod console;
pub mod domain;
pub mod telemetry;
