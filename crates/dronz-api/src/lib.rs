//! REST client for the PizzaDronz delivery service API.
//!
//! The wire format matches the core models directly (camelCase JSON), so
//! no separate DTO layer is needed.

pub mod client;

pub use client::ApiClient;
