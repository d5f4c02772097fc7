//! Credential handling for the controller's Basic-auth scheme.
//!
//! The device compares the `Authorization: Basic <token>` header against a
//! digest it builds from its configured username and password. This module
//! mints that token and keeps it in the OS keychain between runs; a missing
//! entry is a valid state and simply produces unauthenticated requests.

pub mod credentials;

pub use credentials::{encode_basic_token, CredentialStore};
