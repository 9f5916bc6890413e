pub mod action;
pub mod commands;
pub mod config;
pub mod http;
pub mod metadata;
pub mod package;
pub mod repository;
pub mod runtime;
pub mod source;
pub mod trace;
