//! Configuration modules for the Rollcall API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with sane defaults for development.
//!
//! - [`cors`]: allowed origins for the CORS layer
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`jwt`]: JWT secret and token expiry

pub mod cors;
pub mod database;
pub mod jwt;
