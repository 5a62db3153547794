pub mod app;
pub mod collector;
pub mod config;
pub mod error;
pub mod http;
pub mod input;
pub mod pipeline;
pub mod provider;
