use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::attendance::model::{
    AttendanceRecord, AttendanceRecordInfo, AttendanceStatus, BatchAttendanceEntry,
    MarkAttendanceBatchDto, MarkAttendanceDto, OwnAttendanceResponse, UnmarkedDatesResponse,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use crate::modules::classes::model::{
    AddStudentDto, Class, ClassDetailResponse, ClassSummary, CreateClassDto, UpdateClassDto,
};
use crate::modules::join_requests::model::{
    DecideJoinRequestDto, JoinDecision, JoinRequest, JoinRequestInfo, JoinStatus,
};
use crate::modules::profiles::model::{
    ClassAttendanceSummary, ProfileDetailResponse, ProfileInfo, ProfileSummaryResponse, Role,
    UpdateProfileDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::profiles::controller::get_own_profile,
        crate::modules::profiles::controller::update_own_profile,
        crate::modules::profiles::controller::get_profile_detail,
        crate::modules::profiles::controller::get_profile_summary,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::search_classes,
        crate::modules::classes::controller::list_taught_classes,
        crate::modules::classes::controller::list_enrolled_classes,
        crate::modules::classes::controller::get_class_detail,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::classes::controller::add_student,
        crate::modules::classes::controller::remove_student,
        crate::modules::classes::controller::leave_class,
        crate::modules::join_requests::controller::send_join_request,
        crate::modules::join_requests::controller::list_pending_join_requests,
        crate::modules::join_requests::controller::decide_join_request,
        crate::modules::attendance::controller::mark_attendance,
        crate::modules::attendance::controller::mark_attendance_batch,
        crate::modules::attendance::controller::list_class_attendance,
        crate::modules::attendance::controller::list_unmarked_dates,
        crate::modules::attendance::controller::list_own_attendance,
    ),
    components(
        schemas(
            ErrorResponse,
            MessageResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            Role,
            ProfileInfo,
            UpdateProfileDto,
            ProfileDetailResponse,
            ProfileSummaryResponse,
            ClassAttendanceSummary,
            Class,
            ClassSummary,
            ClassDetailResponse,
            CreateClassDto,
            UpdateClassDto,
            AddStudentDto,
            JoinStatus,
            JoinRequest,
            JoinRequestInfo,
            JoinDecision,
            DecideJoinRequestDto,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceRecordInfo,
            MarkAttendanceDto,
            BatchAttendanceEntry,
            MarkAttendanceBatchDto,
            UnmarkedDatesResponse,
            OwnAttendanceResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Profiles", description = "Profiles and attendance summaries"),
        (name = "Classes", description = "Class registry and roster management"),
        (name = "Join Requests", description = "Enrollment request workflow"),
        (name = "Attendance", description = "Attendance ledger")
    ),
    info(
        title = "Rollcall API",
        version = "0.1.0",
        description = "A classroom attendance REST API built with Rust, Axum, and PostgreSQL.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
