use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{AppServices, error_response};
use crate::models::activities::requests::CreateActivityRequest;
use crate::models::categories::requests::CreateCategoryRequest;
use crate::models::enrollments::responses::CourseRoster;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_categories(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.categories.list_by_course(&course_id).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            categories,
            "Categories retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

pub async fn create_category(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
    category_data: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .categories
        .create(&course_id, category_data.into_inner())
        .await
    {
        Ok(created) => {
            let message = if created.partition.failures.is_empty() {
                "Category created successfully"
            } else {
                "Category created, but some groups could not be set up"
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(created, message)))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

pub async fn category_summary(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.categories.summary_by_mode(&course_id).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Category summary retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

pub async fn list_activities(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.activities.list_by_course(&course_id).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            activities,
            "Activities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

pub async fn create_activity(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
    activity_data: web::Json<CreateActivityRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .activities
        .create(&course_id, activity_data.into_inner())
        .await
    {
        Ok(activity) => Ok(HttpResponse::Created().json(ApiResponse::success(
            activity,
            "Activity created successfully",
        ))),
        // 只有引用的分类可能不存在
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn activity_stats(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.activities.stats_by_course(&course_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Activity statistics retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

pub async fn list_students(
    services: web::Data<AppServices>,
    course_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let course_id = course_id.into_inner();
    match services.enrollments.course_students(&course_id).await {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseRoster {
                course_id,
                students,
            },
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::NotFound)),
    }
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses/{course_id}")
            .service(
                web::resource("/categories")
                    .route(web::get().to(list_categories))
                    .route(web::post().to(create_category)),
            )
            .service(web::resource("/categories/summary").route(web::get().to(category_summary)))
            .service(
                web::resource("/activities")
                    .route(web::get().to(list_activities))
                    .route(web::post().to(create_activity)),
            )
            .service(web::resource("/activities/stats").route(web::get().to(activity_stats)))
            .service(web::resource("/students").route(web::get().to(list_students))),
    );
}
