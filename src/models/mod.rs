pub mod activities;
pub mod categories;
pub mod common;
pub mod enrollments;
pub mod grades;
pub mod groups;

pub use common::response::ApiResponse;

// 业务错误码，写入 ApiResponse.code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    InternalServerError = 1500,

    // 分类
    CategoryNotFound = 2000,
    CategoryCreationFailed = 2001,
    CategoryDeleteIncomplete = 2002,

    // 小组
    GroupNotFound = 3000,
    GroupFull = 3001,
    AlreadyInCategoryGroup = 3002,
    MembershipNotFound = 3003,
    GroupDeleteIncomplete = 3004,

    // 活动
    ActivityNotFound = 4000,

    // 评分
    GradeNotFound = 5000,
    StudentNotGraded = 5001,
}
