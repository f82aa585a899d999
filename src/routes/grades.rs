use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{AppServices, error_response};
use crate::models::grades::requests::{MyGradeQuery, SaveGradeRequest};
use crate::models::{ApiResponse, ErrorCode};

// 教师查看活动的评分排名
pub async fn activity_results(
    services: web::Data<AppServices>,
    activity_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.grades.activity_results(&activity_id).await {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            results,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

pub async fn save_grade(
    services: web::Data<AppServices>,
    activity_id: web::Path<String>,
    grade_data: web::Json<SaveGradeRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .grades
        .save_grade(&activity_id, grade_data.into_inner())
        .await
    {
        Ok(grade) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade saved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

pub async fn my_grade(
    services: web::Data<AppServices>,
    path: web::Path<(String, String)>,
    query: web::Query<MyGradeQuery>,
) -> ActixResult<HttpResponse> {
    let (activity_id, student_id) = path.into_inner();
    match services
        .grades
        .my_grade_for_student(&activity_id, &student_id, &query.grader_id)
        .await
    {
        Ok(Some(grade)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            grade,
            "Grade retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotFound,
            "Grade not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::GradeNotFound)),
    }
}

pub async fn student_standing(
    services: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (activity_id, student_id) = path.into_inner();
    match services
        .grades
        .student_standing(&activity_id, &student_id)
        .await
    {
        Ok(Some(standing)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            standing,
            "Standing retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotGraded,
            "Student has not been graded for this activity",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/activities/{activity_id}/grades")
            .route(web::get().to(activity_results))
            .route(web::put().to(save_grade)),
    )
    .service(
        web::resource("/api/v1/activities/{activity_id}/grades/{student_id}")
            .route(web::get().to(my_grade)),
    )
    .service(
        web::resource("/api/v1/activities/{activity_id}/standing/{student_id}")
            .route(web::get().to(student_standing)),
    );
}
