//! Signal group bot that replies to stored trigger phrases.

pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod pagination;
