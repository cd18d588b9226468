// dbxlink-lib: Dropbox action coordination for repository documents

pub mod actions;
pub mod backend;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod host;
pub mod http_client;
pub mod logger;
pub mod messages;
pub mod output;
pub mod profile;
pub mod tui;
