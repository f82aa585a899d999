use tracing::info;

use super::CategoryService;
use crate::errors::{PeerGroupsError, Result};
use crate::models::categories::entities::{Category, CategoryPatch};
use crate::models::categories::requests::UpdateCategoryRequest;
use crate::storage::{Collection, find_by_id, update_fields};
use crate::utils::validate::{require_text, validate_capacity};

pub async fn update_category(
    service: &CategoryService,
    category_id: &str,
    request: UpdateCategoryRequest,
) -> Result<Category> {
    let not_found = || PeerGroupsError::not_found(format!("Category {category_id} not found"));
    let category = find_by_id::<Category>(service.storage(), category_id)
        .await?
        .ok_or_else(not_found)?;

    let patch = CategoryPatch {
        name: request
            .name
            .map(|name| require_text(&name, "name"))
            .transpose()?,
        mode: request.mode,
        capacity: request.capacity.map(validate_capacity).transpose()?,
        description: request.description.map(|d| d.trim().to_string()),
    };
    if patch.is_empty() {
        return Ok(category);
    }

    update_fields(service.storage(), Collection::Categories, category_id, &patch).await?;
    info!("Updated category {}", category_id);

    find_by_id::<Category>(service.storage(), category_id)
        .await?
        .ok_or_else(not_found)
}
