//! Classes module.
//!
//! Class registry and roster management: create/update/delete by the owning
//! teacher, direct enrollment by username, student-initiated leave, and the
//! taught/enrolled/search listings.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
