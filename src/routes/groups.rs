use actix_web::{HttpResponse, Result as ActixResult, web};

use super::{AppServices, error_response, join_response};
use crate::errors::PeerGroupsError;
use crate::models::groups::requests::{
    JoinGroupRequest, TransferStudentRequest, UpdateGroupRequest,
};
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_group(
    services: web::Data<AppServices>,
    group_id: web::Path<String>,
    update_data: web::Json<UpdateGroupRequest>,
) -> ActixResult<HttpResponse> {
    match services
        .groups
        .update_group(&group_id, update_data.into_inner())
        .await
    {
        Ok(group) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            group,
            "Group updated successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::GroupNotFound)),
    }
}

pub async fn delete_group(
    services: web::Data<AppServices>,
    group_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.groups.delete_group(&group_id).await {
        Ok(()) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Group deleted successfully")))
        }
        Err(PeerGroupsError::PartialFailure(msg)) => Ok(HttpResponse::InternalServerError()
            .json(ApiResponse::error_empty(ErrorCode::GroupDeleteIncomplete, msg))),
        Err(e) => Ok(error_response(&e, ErrorCode::GroupNotFound)),
    }
}

pub async fn list_members(
    services: web::Data<AppServices>,
    group_id: web::Path<String>,
) -> ActixResult<HttpResponse> {
    match services.groups.list_members(&group_id).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            members,
            "Members retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::GroupNotFound)),
    }
}

pub async fn join_group(
    services: web::Data<AppServices>,
    group_id: web::Path<String>,
    join_data: web::Json<JoinGroupRequest>,
) -> ActixResult<HttpResponse> {
    match services.groups.join(&group_id, &join_data.student_id).await {
        Ok(outcome) => Ok(join_response(outcome, "Joined group successfully")),
        Err(e) => Ok(error_response(&e, ErrorCode::GroupNotFound)),
    }
}

pub async fn remove_member(
    services: web::Data<AppServices>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (group_id, student_id) = path.into_inner();
    match services.groups.remove_member(&group_id, &student_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Student removed from group",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCode::MembershipNotFound)),
    }
}

pub async fn transfer_student(
    services: web::Data<AppServices>,
    group_id: web::Path<String>,
    transfer_data: web::Json<TransferStudentRequest>,
) -> ActixResult<HttpResponse> {
    let transfer = transfer_data.into_inner();
    match services
        .groups
        .transfer(&group_id, &transfer.to_group_id, &transfer.student_id)
        .await
    {
        Ok(outcome) => Ok(join_response(outcome, "Student moved successfully")),
        Err(e) => Ok(error_response(&e, ErrorCode::MembershipNotFound)),
    }
}

// 配置路由
pub fn configure_groups_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/groups/{group_id}")
            .service(
                web::resource("")
                    .route(web::put().to(update_group))
                    .route(web::delete().to(delete_group)),
            )
            .service(
                web::resource("/members")
                    .route(web::get().to(list_members))
                    .route(web::post().to(join_group)),
            )
            .service(
                // 学生退出与教师移除共用
                web::resource("/members/{student_id}").route(web::delete().to(remove_member)),
            )
            .service(web::resource("/transfer").route(web::post().to(transfer_student))),
    );
}
