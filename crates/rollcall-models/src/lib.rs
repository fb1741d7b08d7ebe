//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! This crate provides all data structures used throughout the Rollcall
//! application, including database entities, request/response DTOs, and
//! validation schemas.
//!
//! # Modules
//!
//! - [`auth`]: Authentication models (registration, login, JWT claims)
//! - [`profiles`]: Profile entities, roles, and attendance summaries
//! - [`classes`]: Class entities and roster DTOs
//! - [`join_requests`]: Join-request workflow models
//! - [`attendance`]: Attendance records, statuses, and marking DTOs

pub mod attendance;
pub mod auth;
pub mod classes;
pub mod join_requests;
pub mod profiles;

// Re-export commonly used types at crate root for convenience
pub use attendance::{
    AttendanceQuery, AttendanceRecord, AttendanceRecordInfo, AttendanceStatus,
    BatchAttendanceEntry, MarkAttendanceBatchDto, MarkAttendanceDto, OwnAttendanceResponse,
    UnmarkedDatesQuery, UnmarkedDatesResponse,
};

pub use auth::{AuthResponse, Claims, LoginRequest, MessageResponse, RegisterRequest};

pub use classes::{
    AddStudentDto, Class, ClassDetailResponse, ClassSearchParams, ClassSummary, CreateClassDto,
    UpdateClassDto,
};

pub use join_requests::{
    DecideJoinRequestDto, JoinDecision, JoinRequest, JoinRequestInfo, JoinStatus,
};

pub use profiles::{
    ClassAttendanceSummary, Profile, ProfileDetailResponse, ProfileInfo, ProfileSummaryResponse,
    Role, UpdateProfileDto,
};
