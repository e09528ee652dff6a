pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod interactive;
pub mod session;
pub mod upload;
