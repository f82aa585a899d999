use chrono::Utc;
use tracing::warn;

use super::{CategoryService, stats};
use crate::errors::{PeerGroupsError, Result};
use crate::models::activities::entities::Activity;
use crate::models::categories::entities::Category;
use crate::models::categories::responses::{CategoryModeSummary, CategorySummary};
use crate::models::groups::entities::{Group, GroupMembership};
use crate::services::activities::list::sort_by_due_date;
use crate::storage::{Collection, find_by_id, load_all};

/// 统计所需的次要集合；读取失败时记录日志并按空集合统计
async fn load_related(
    service: &CategoryService,
) -> (Vec<Activity>, Vec<Group>, Vec<GroupMembership>) {
    let storage = service.storage();
    let (activities, groups, memberships) = futures_util::join!(
        load_all::<Activity>(storage),
        load_all::<Group>(storage),
        load_all::<GroupMembership>(storage),
    );
    (
        or_empty(activities, Collection::Activities),
        or_empty(groups, Collection::Groups),
        or_empty(memberships, Collection::GroupMembers),
    )
}

fn or_empty<T>(result: Result<Vec<T>>, collection: Collection) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Statistics from {} unavailable, counting as zero: {}", collection, e);
        Vec::new()
    })
}

async fn course_categories(service: &CategoryService, course_id: &str) -> Result<Vec<Category>> {
    let course_id = course_id.trim();
    let categories: Vec<Category> = load_all(service.storage()).await?;
    Ok(categories
        .into_iter()
        .filter(|category| category.course_id == course_id)
        .collect())
}

pub async fn list_by_course(
    service: &CategoryService,
    course_id: &str,
) -> Result<Vec<CategorySummary>> {
    let categories = course_categories(service, course_id).await?;
    if categories.is_empty() {
        return Ok(Vec::new());
    }

    let (activities, groups, memberships) = load_related(service).await;
    Ok(stats::summarize_all(
        categories,
        &activities,
        &groups,
        &memberships,
        Utc::now(),
    ))
}

pub async fn get_by_id(
    service: &CategoryService,
    category_id: &str,
) -> Result<Option<CategorySummary>> {
    let Some(category) = find_by_id::<Category>(service.storage(), category_id).await? else {
        return Ok(None);
    };

    let (activities, groups, memberships) = load_related(service).await;
    Ok(stats::summarize_all(
        vec![category],
        &activities,
        &groups,
        &memberships,
        Utc::now(),
    )
    .pop())
}

pub async fn summary_by_mode(
    service: &CategoryService,
    course_id: &str,
) -> Result<CategoryModeSummary> {
    let categories = course_categories(service, course_id).await?;
    Ok(stats::summarize_modes(&categories))
}

pub async fn list_activities(service: &CategoryService, category_id: &str) -> Result<Vec<Activity>> {
    if find_by_id::<Category>(service.storage(), category_id)
        .await?
        .is_none()
    {
        return Err(PeerGroupsError::not_found(format!(
            "Category {category_id} not found"
        )));
    }

    let activities: Vec<Activity> = load_all(service.storage()).await?;
    let mut activities: Vec<Activity> = activities
        .into_iter()
        .filter(|a| a.category_id.as_deref() == Some(category_id))
        .collect();
    sort_by_due_date(&mut activities, |a| a.due_date);
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::{FlakyStorage, seed};
    use serde_json::json;
    use std::sync::Arc;

    async fn seed_course(store: &MemoryStorage) -> Vec<String> {
        let categories = seed(
            store,
            Collection::Categories,
            vec![
                json!({"course_id": "c1", "name": "projects", "type": "random", "capacity": 2}),
                json!({"course_id": "c1", "name": "Exams", "type": "choice", "capacity": 4}),
                json!({"course_id": "c2", "name": "Other", "type": "choice", "capacity": 4}),
            ],
        )
        .await;
        let groups = seed(
            store,
            Collection::Groups,
            vec![json!({"category_id": categories[0], "name": "Group 1"})],
        )
        .await;
        seed(
            store,
            Collection::GroupMembers,
            vec![json!({"group_id": groups[0], "student_id": "s1"})],
        )
        .await;
        seed(
            store,
            Collection::Activities,
            vec![
                json!({"course_id": "c1", "category_id": categories[0], "title": "B", "due_date": "2001-01-01"}),
                json!({"course_id": "c1", "category_id": categories[0], "title": "C"}),
                json!({"course_id": "c1", "category_id": categories[0], "title": "A", "due_date": "2000-01-01"}),
            ],
        )
        .await;
        categories
    }

    #[tokio::test]
    async fn test_list_by_course_decorates_and_sorts() {
        let store = Arc::new(MemoryStorage::new());
        seed_course(&store).await;
        let service = CategoryService::new(store);

        let summaries = service.list_by_course(" c1 ").await.unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.category.name.as_str()).collect();
        assert_eq!(names, vec!["Exams", "projects"]);
        assert_eq!(summaries[1].group_count, 1);
        assert_eq!(summaries[1].total_members, 1);
        assert_eq!(summaries[1].overdue_activities, 2);
        assert_eq!(summaries[1].pending_activities, 1);

        let modes = service.summary_by_mode("c1").await.unwrap();
        assert_eq!(modes.total, 2);
        assert_eq!(modes.by_mode.get("random"), Some(&1));
    }

    #[tokio::test]
    async fn test_failed_secondary_read_counts_as_zero() {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        let categories = seed_course(&store.inner).await;
        store.fail_read(Collection::Activities);
        let service = CategoryService::new(store.clone());

        let summary = service.get_by_id(&categories[0]).await.unwrap().unwrap();
        assert_eq!(summary.activity_count, 0);
        assert_eq!(summary.group_count, 1);

        store.fail_read(Collection::Categories);
        assert!(service.list_by_course("c1").await.is_err());
    }

    #[tokio::test]
    async fn test_list_activities_sorted_by_due_date() {
        let store = Arc::new(MemoryStorage::new());
        let categories = seed_course(&store).await;
        let service = CategoryService::new(store);

        let titles: Vec<String> = service
            .list_activities(&categories[0])
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
        assert!(service.get_by_id("nope").await.unwrap().is_none());
        assert!(service.list_activities("nope").await.is_err());
    }
}
