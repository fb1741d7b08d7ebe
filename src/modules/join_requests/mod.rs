//! Join-request module.
//!
//! Student-initiated enrollment requests: Pending until the owning teacher
//! approves (which also enrolls) or rejects. Decided requests are terminal;
//! a new request replaces the decided row.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
