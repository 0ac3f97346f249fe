//! The `taskpad` library crate.
//!
//! Contains the authentication stack (password hashing, token issuing and
//! verification, identity middleware, ownership guard), the domain models,
//! the owner-scoped persistence layer, routing configuration, and error
//! handling for the taskpad backend. The main binary (`main.rs`) uses it to
//! construct and run the application.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
