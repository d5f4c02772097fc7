//! HTTP client module for the door-access controller.
//!
//! This module provides the `DeviceClient` for talking to the controller's
//! JSON API under its fixed `/api` root.
//!
//! The API uses HTTP Basic authentication; the opaque token is injected at
//! client construction and attached to every request while present.

pub mod client;
pub mod error;

pub use client::DeviceClient;
pub use error::ApiError;
