//! Attendance module.
//!
//! Per-date status records written only by the owning teacher, with upsert
//! semantics on (class, student, date), all-or-nothing batch marking, the
//! unmarked-date calendar, and the student's own history with absence-rate
//! warnings.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
