use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{AppServices, error_response};
use crate::errors::PeerGroupsError;
use crate::models::categories::requests::UpdateCategoryRequest;
use crate::models::groups::requests::{AvailableStudentsQuery, CreateGroupRequest};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_category(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.categories.get_by_id(&category_id).await {
        Ok(Some(category)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            category,
            "Category retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CategoryNotFound,
            "Category not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn update_category(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
    update_data: web::Json<UpdateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .categories
        .update(&category_id, update_data.into_inner())
        .await
    {
        Ok(category) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            category,
            "Category updated successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn delete_category(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.categories.delete(&category_id).await {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Category deleted successfully")))
        }
        Err(PeerGroupsError::PartialFailure(msg)) => Ok(HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::CategoryDeleteIncomplete, msg))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn list_groups(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.groups.list_groups_in_category(&category_id).await {
        Ok(groups) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            groups,
            "Groups retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn create_group(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
    group_data: web::Json<CreateGroupRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .groups
        .create_group(&category_id, group_data.into_inner())
        .await
    {
        Ok(created) => {
            let message = if created.is_complete() {
                "Group created successfully"
            } else {
                "Group created, but some students could not be added"
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(created, message)))
        }
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn list_category_activities(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.categories.list_activities(&category_id).await {
        Ok(activities) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            activities,
            "Activities retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn available_students(
    services: web::Data<AppServices>,
    category_id: web::Path<String>,
    query: web::Query<AvailableStudentsQuery>,
) -> ActixResult<HttpResponse> {
    match services
        .groups
        .available_students(&category_id, &query.course_id)
        .await
    {
        Ok(students) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            students,
            "Available students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::CategoryNotFound)),
    }
}

pub async fn student_group(
    services: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (category_id, student_id) = path.into_inner();
    match services
        .groups
        .student_group_in_category(&student_id, &category_id)
        .await
    {
        Ok(Some(membership)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            membership,
            "Membership retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MembershipNotFound,
            "Student has no group in this category",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::MembershipNotFound)),
    }
}

pub async fn remove_student(
    services: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (category_id, student_id) = path.into_inner();
    match services
        .groups
        .remove_student_from_category(&category_id, &student_id)
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Student removed from category",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MembershipNotFound,
            "Student has no group in this category",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::MembershipNotFound)),
    }
}

// 配置路由
pub fn configure_categories_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/categories/{category_id}")
            .service(
                web::resource("")
                    .route(web::get().to(get_category))
                    .route(web::put().to(update_category))
                    .route(web::delete().to(delete_category)),
            )
            .service(
                web::resource("/groups")
                    .route(web::get().to(list_groups))
                    .route(web::post().to(create_group)),
            )
            .service(web::resource("/activities").route(web::get().to(list_category_activities)))
            .service(
                web::resource("/available-students").route(web::get().to(available_students)),
            )
            .service(
                web::resource("/students/{student_id}")
                    .route(web::get().to(student_group))
                    // 教师把学生移出该分类的小组
                    .route(web::delete().to(remove_student)),
            ),
    );
}
