//! Class models, re-exported from the shared models crate.

pub use rollcall_models::classes::*;
