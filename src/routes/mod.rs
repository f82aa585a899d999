pub mod activities;
pub mod categories;
pub mod courses;
pub mod grades;
pub mod groups;

pub use activities::configure_activities_routes;
pub use categories::configure_categories_routes;
pub use courses::configure_courses_routes;
pub use grades::configure_grades_routes;
pub use groups::configure_groups_routes;

use std::sync::Arc;

use actix_web::HttpResponse;
use tracing::{debug, error};

use crate::config::GroupingConfig;
use crate::errors::PeerGroupsError;
use crate::models::groups::responses::JoinOutcome;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    ActivityService, CategoryService, EnrollmentService, GradeService, GroupService,
};
use crate::storage::RecordStore;

/// 注册到应用中的服务集合
#[derive(Clone)]
pub struct AppServices {
    pub categories: CategoryService,
    pub groups: GroupService,
    pub activities: ActivityService,
    pub grades: GradeService,
    pub enrollments: EnrollmentService,
}

impl AppServices {
    pub fn new(storage: Arc<dyn RecordStore>, grouping: GroupingConfig) -> Self {
        Self {
            categories: CategoryService::with_config(storage.clone(), grouping.clone()),
            groups: GroupService::with_config(storage.clone(), grouping),
            activities: ActivityService::new(storage.clone()),
            grades: GradeService::new(storage.clone()),
            enrollments: EnrollmentService::new(storage),
        }
    }
}

/// 领域错误转换为统一响应；`not_found` 为该资源的 NotFound 错误码
pub(crate) fn error_response(err: &PeerGroupsError, not_found: ErrorCode) -> HttpResponse {
    match err {
        PeerGroupsError::Validation(msg) => {
            debug!("Rejected request: {}", msg);
            HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg.as_str()))
        }
        PeerGroupsError::NotFound(msg) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(not_found, msg.as_str()))
        }
        other => {
            error!("{}", other.format_simple());
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                other.to_string(),
            ))
        }
    }
}

/// 加入或换组的结果；被拒绝时返回 409
pub(crate) fn join_response(outcome: JoinOutcome, message: &str) -> HttpResponse {
    match outcome {
        JoinOutcome::Joined(membership) => {
            HttpResponse::Ok().json(ApiResponse::success(membership, message))
        }
        JoinOutcome::GroupFull {
            capacity,
            member_count,
        } => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::GroupFull,
            format!("Group is full ({member_count}/{capacity})"),
        )),
        JoinOutcome::AlreadyInCategory { group_id } => {
            HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyInCategoryGroup,
                format!("Student already belongs to group {group_id} in this category"),
            ))
        }
        JoinOutcome::GroupNotFound => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GroupNotFound,
            "Group not found",
        )),
    }
}
