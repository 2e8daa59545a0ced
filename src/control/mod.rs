pub mod commands;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod state;
pub mod system;
pub mod volume;
