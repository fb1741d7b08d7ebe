//! Join-request models, re-exported from the shared models crate.

pub use rollcall_models::join_requests::*;
