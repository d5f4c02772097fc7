//! Core library for latchkey, a client for networked door-access controllers.
//!
//! This crate provides:
//! - [`api::DeviceClient`]: an authenticated HTTP client for the controller's
//!   JSON API
//! - [`auth::CredentialStore`]: OS-keychain storage for the Basic-auth token
//! - [`config::Config`]: persistent application configuration
//! - [`models`]: typed request and response shapes for the device API

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiError, DeviceClient};
pub use auth::{encode_basic_token, CredentialStore};
pub use config::Config;
