//! wcschat core library: weighted linear layout, chat controller and worker,
//! conversation service client, and config, shared by the desktop window and CLI.

pub mod chat;
pub mod config;
pub mod init;
pub mod layout;
pub mod service;
