use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::ActivityService;
use crate::errors::Result;
use crate::models::activities::entities::Activity;
use crate::models::activities::responses::{ActivityListItem, ActivityStats};
use crate::models::categories::entities::Category;
use crate::storage::{find_by_id, load_all};

/// 按截止时间升序排序，没有截止时间的排在最后（稳定排序）
pub fn sort_by_due_date<T, F>(items: &mut [T], due_date: F)
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    items.sort_by(|a, b| match (due_date(a), due_date(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// 课程活动统计：只有设置了截止时间的活动计入待完成或已过期
pub fn course_stats(activities: &[Activity], now: DateTime<Utc>) -> ActivityStats {
    let mut stats = ActivityStats {
        total: activities.len(),
        ..Default::default()
    };
    for due in activities.iter().filter_map(|a| a.due_date) {
        if due < now {
            stats.overdue += 1;
        } else {
            stats.pending += 1;
        }
    }
    stats
}

async fn course_activities(service: &ActivityService, course_id: &str) -> Result<Vec<Activity>> {
    let course_id = course_id.trim();
    let activities: Vec<Activity> = load_all(service.storage()).await?;
    Ok(activities
        .into_iter()
        .filter(|a| a.course_id == course_id)
        .collect())
}

pub async fn get_activity(service: &ActivityService, activity_id: &str) -> Result<Option<Activity>> {
    find_by_id(service.storage(), activity_id).await
}

pub async fn list_by_course(
    service: &ActivityService,
    course_id: &str,
) -> Result<Vec<ActivityListItem>> {
    let activities = course_activities(service, course_id).await?;
    let categories: Vec<Category> = load_all(service.storage()).await?;
    let categories: HashMap<&str, &Category> =
        categories.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut items: Vec<ActivityListItem> = activities
        .into_iter()
        .map(|activity| {
            let category = activity
                .category_id
                .as_deref()
                .and_then(|id| categories.get(id));
            ActivityListItem {
                category_name: category.map(|c| c.name.clone()),
                category_mode: category.map(|c| c.mode),
                activity,
            }
        })
        .collect();
    sort_by_due_date(&mut items, |item| item.activity.due_date);
    Ok(items)
}

pub async fn stats_by_course(service: &ActivityService, course_id: &str) -> Result<ActivityStats> {
    let activities = course_activities(service, course_id).await?;
    Ok(course_stats(&activities, Utc::now()))
}
