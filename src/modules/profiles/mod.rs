//! Profiles module.
//!
//! Owner-only profile editing plus the attendance-facing read models:
//! profile detail (records + overall absence rate) and the per-class
//! presence-rate summary.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
