pub mod attendance;
pub mod auth;
pub mod classes;
pub mod join_requests;
pub mod profiles;
