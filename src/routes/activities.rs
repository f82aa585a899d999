use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{AppServices, error_response};
use crate::models::activities::requests::UpdateActivityRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_activity(
    services: web::Data<AppServices>,
    activity_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.activities.get(&activity_id).await {
        Ok(Some(activity)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            activity,
            "Activity retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ActivityNotFound,
            "Activity not found",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

pub async fn update_activity(
    services: web::Data<AppServices>,
    activity_id: web::Path<String>,
    update_data: web::Json<UpdateActivityRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .activities
        .update(&activity_id, update_data.into_inner())
        .await
    {
        Ok(activity) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            activity,
            "Activity updated successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

pub async fn delete_activity(
    services: web::Data<AppServices>,
    activity_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.activities.delete(&activity_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Activity deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::ActivityNotFound)),
    }
}

// 配置路由
pub fn configure_activities_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/v1/activities/{activity_id}")
            .route(web::get().to(get_activity))
            .route(web::put().to(update_activity))
            .route(web::delete().to(delete_activity)),
    );
}
