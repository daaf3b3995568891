//! Shared types, errors, and configuration for Polifund.
//!
//! This crate provides common building blocks used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - The Hub registry client

pub mod config;
pub mod error;
pub mod hub;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use hub::{HubApi, HubClient, HubError};
