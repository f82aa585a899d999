use tracing::{info, warn};

use super::CategoryService;
use crate::errors::Result;
use crate::models::categories::entities::{Category, NewCategory};
use crate::models::categories::requests::CreateCategoryRequest;
use crate::models::categories::responses::CategoryCreated;
use crate::storage::insert_one;
use crate::utils::validate::{optional_text, require_text, validate_capacity};

pub async fn create_category(
    service: &CategoryService,
    course_id: &str,
    request: CreateCategoryRequest,
) -> Result<CategoryCreated> {
    let course_id = require_text(course_id, "course_id")?;
    let name = require_text(&request.name, "name")?;
    let capacity =
        validate_capacity(request.capacity.unwrap_or(service.grouping().default_capacity))?;
    let mode = request
        .mode
        .unwrap_or_else(|| service.grouping().assignment_mode());

    let category: Category = insert_one(
        service.storage(),
        &NewCategory {
            course_id,
            name,
            mode,
            capacity,
            description: optional_text(request.description),
        },
    )
    .await?;
    info!(
        "Created {} category {} ({}) in course {} with capacity {}",
        category.mode, category.name, category.id, category.course_id, category.capacity
    );

    // 分组失败不影响分类本身的创建
    let partition = service.groups().create_groups_for_category(&category).await;
    if !partition.failures.is_empty() {
        warn!(
            "Category {} created with an incomplete partition: {}",
            category.id,
            partition.failures.join("; ")
        );
    }

    Ok(CategoryCreated {
        category,
        partition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupingConfig;
    use crate::models::categories::entities::AssignmentMode;
    use crate::storage::Collection;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::{FlakyStorage, seed};
    use serde_json::json;
    use std::sync::Arc;

    async fn seed_roster(store: &MemoryStorage, n: usize) {
        seed(
            store,
            Collection::Enrollments,
            (1..=n)
                .map(|i| json!({"course_id": "c1", "student_id": format!("s{i}"), "role": "student"}))
                .collect(),
        )
        .await;
    }

    fn request(mode: Option<AssignmentMode>, capacity: Option<u32>) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: "Project".into(),
            mode,
            capacity,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_create_random_category_partitions_roster() {
        let store = Arc::new(MemoryStorage::new());
        seed_roster(&store, 11).await;
        let service = CategoryService::new(store.clone());

        let created = service
            .create("c1", request(Some(AssignmentMode::Random), Some(4)))
            .await
            .unwrap();
        assert_eq!(created.category.capacity, 4);
        assert_eq!(created.partition.groups_created, 3);
        assert_eq!(created.partition.students_assigned, 11);
        assert_eq!(store.count(Collection::GroupMembers), 11);
    }

    #[tokio::test]
    async fn test_create_uses_configured_defaults() {
        let store = Arc::new(MemoryStorage::new());
        seed_roster(&store, 6).await;
        let grouping = GroupingConfig {
            default_capacity: 3,
            default_mode: "random".into(),
            group_name_prefix: "Equipo".into(),
        };
        let service = CategoryService::with_config(store.clone(), grouping);

        let created = service.create("c1", request(None, None)).await.unwrap();
        assert_eq!(created.category.mode, AssignmentMode::Random);
        assert_eq!(created.category.capacity, 3);
        let groups = service
            .groups()
            .list_groups_in_category(&created.category.id)
            .await
            .unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.group.name.as_str()).collect();
        assert_eq!(names, vec!["Equipo 1", "Equipo 2"]);
        assert!(groups.iter().all(|g| g.member_count == 3));
    }

    #[tokio::test]
    async fn test_empty_roster_creates_no_groups() {
        let store = Arc::new(MemoryStorage::new());
        let service = CategoryService::new(store.clone());

        let created = service
            .create("c1", request(Some(AssignmentMode::Random), Some(5)))
            .await
            .unwrap();
        assert_eq!(created.partition.groups_created, 0);
        assert_eq!(store.count(Collection::Categories), 1);
        assert_eq!(store.count(Collection::Groups), 0);
    }

    #[tokio::test]
    async fn test_partition_failure_does_not_block_creation() {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        seed_roster(&store.inner, 4).await;
        store.fail_insert(Collection::Groups, 1);
        let service = CategoryService::new(store.clone());

        let created = service
            .create("c1", request(Some(AssignmentMode::Random), Some(2)))
            .await
            .unwrap();
        assert_eq!(created.partition.groups_created, 1);
        assert_eq!(created.partition.failures.len(), 1);
        assert_eq!(created.partition.students_assigned, 2);
        assert_eq!(store.inner.count(Collection::Categories), 1);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let service = CategoryService::new(Arc::new(MemoryStorage::new()));
        let zero = service
            .create("c1", request(None, Some(0)))
            .await
            .unwrap_err();
        assert_eq!(zero.code(), "E007");

        let mut blank = request(None, None);
        blank.name = "  ".into();
        assert!(service.create("c1", blank).await.is_err());
        assert!(service.create(" ", request(None, None)).await.is_err());
    }
}
