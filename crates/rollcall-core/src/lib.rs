//! # Rollcall Core
//!
//! Core types and utilities for the Rollcall API.
//!
//! This crate provides foundational pieces used throughout the Rollcall
//! application:
//!
//! - [`errors`]: the application error taxonomy with HTTP response conversion
//! - [`password`]: secure password hashing and verification
//! - [`reporting`]: attendance rate and calendar-range computations
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::errors::AppError;
//! use rollcall_core::password::{hash_password, verify_password};
//! use rollcall_core::reporting::{absence_rate, absence_warning};
//!
//! let error = AppError::not_found("Class not found");
//!
//! let hash = hash_password("secure_password")?;
//!
//! let rate = absence_rate(1, 4);
//! assert!(!absence_warning(rate));
//! ```

pub mod errors;
pub mod password;
pub mod reporting;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use password::{hash_password, verify_password};
