pub mod admin;
pub mod ai_provider;
pub mod assistant;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod loader;
