//! 分类统计（纯计算，每次调用重新计算）

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::models::activities::entities::Activity;
use crate::models::categories::entities::Category;
use crate::models::categories::responses::{CategoryModeSummary, CategorySummary};
use crate::models::groups::entities::{Group, GroupMembership};

/// 为一批分类计算统计，并按名称（不区分大小写）排序
pub fn summarize_all(
    categories: Vec<Category>,
    activities: &[Activity],
    groups: &[Group],
    memberships: &[GroupMembership],
    now: DateTime<Utc>,
) -> Vec<CategorySummary> {
    // 每个小组的人数
    let mut members_per_group: HashMap<&str, usize> = HashMap::new();
    for membership in memberships {
        *members_per_group
            .entry(membership.group_id.as_str())
            .or_default() += 1;
    }

    let mut summaries: Vec<CategorySummary> = categories
        .into_iter()
        .map(|category| summarize(category, activities, groups, &members_per_group, now))
        .collect();
    summaries.sort_by_cached_key(|summary| summary.category.name.to_lowercase());
    summaries
}

fn summarize(
    category: Category,
    activities: &[Activity],
    groups: &[Group],
    members_per_group: &HashMap<&str, usize>,
    now: DateTime<Utc>,
) -> CategorySummary {
    let mut activity_count = 0;
    let mut overdue_activities = 0;
    for activity in activities
        .iter()
        .filter(|a| a.category_id.as_deref() == Some(category.id.as_str()))
    {
        activity_count += 1;
        if activity.is_overdue(now) {
            overdue_activities += 1;
        }
    }

    let group_ids: HashSet<&str> = groups
        .iter()
        .filter(|g| g.category_id == category.id)
        .map(|g| g.id.as_str())
        .collect();
    let total_members = group_ids
        .iter()
        .map(|id| members_per_group.get(id).copied().unwrap_or(0))
        .sum();

    CategorySummary {
        activity_count,
        // 没有截止时间的活动算作待完成
        pending_activities: activity_count - overdue_activities,
        overdue_activities,
        group_count: group_ids.len(),
        total_members,
        category,
    }
}

/// 按分组方式计数
pub fn summarize_modes(categories: &[Category]) -> CategoryModeSummary {
    let mut summary = CategoryModeSummary {
        total: categories.len(),
        ..Default::default()
    };
    for category in categories {
        *summary
            .by_mode
            .entry(category.mode.to_string())
            .or_default() += 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::categories::entities::AssignmentMode;
    use chrono::Duration;

    fn category(id: &str, name: &str, mode: AssignmentMode) -> Category {
        Category {
            id: id.into(),
            course_id: "c1".into(),
            name: name.into(),
            mode,
            capacity: 5,
            description: None,
        }
    }

    fn activity(id: &str, category_id: Option<&str>, due: Option<DateTime<Utc>>) -> Activity {
        Activity {
            id: id.into(),
            course_id: "c1".into(),
            category_id: category_id.map(str::to_string),
            title: id.into(),
            description: None,
            due_date: due,
        }
    }

    fn group(id: &str, category_id: &str) -> Group {
        Group {
            id: id.into(),
            category_id: category_id.into(),
            name: id.into(),
            description: None,
        }
    }

    fn member(group_id: &str, student_id: &str) -> GroupMembership {
        GroupMembership {
            id: format!("{group_id}-{student_id}"),
            group_id: group_id.into(),
            student_id: student_id.into(),
        }
    }

    #[test]
    fn test_summaries_count_activities_and_members() {
        let now = Utc::now();
        let categories = vec![
            category("k1", "projects", AssignmentMode::Random),
            category("k2", "Exams", AssignmentMode::Choice),
        ];
        let activities = vec![
            activity("a1", Some("k1"), Some(now - Duration::days(1))),
            activity("a2", Some("k1"), Some(now + Duration::days(1))),
            activity("a3", Some("k1"), None),
            activity("a4", None, Some(now - Duration::days(3))),
        ];
        let groups = vec![group("g1", "k1"), group("g2", "k1"), group("g3", "k2")];
        let memberships = vec![member("g1", "s1"), member("g1", "s2"), member("g2", "s3")];

        let summaries = summarize_all(categories, &activities, &groups, &memberships, now);
        assert_eq!(summaries[0].category.name, "Exams");
        assert_eq!(summaries[0].group_count, 1);
        assert_eq!(summaries[0].total_members, 0);
        assert_eq!(summaries[0].activity_count, 0);

        let projects = &summaries[1];
        assert_eq!(projects.activity_count, 3);
        assert_eq!(projects.overdue_activities, 1);
        assert_eq!(projects.pending_activities, 2);
        assert_eq!(projects.group_count, 2);
        assert_eq!(projects.total_members, 3);
    }

    #[test]
    fn test_dateless_activity_is_pending() {
        let now = Utc::now();
        let summaries = summarize_all(
            vec![category("k1", "Labs", AssignmentMode::Choice)],
            &[activity("a1", Some("k1"), None)],
            &[],
            &[],
            now,
        );
        assert_eq!(summaries[0].pending_activities, 1);
        assert_eq!(summaries[0].overdue_activities, 0);
    }

    #[test]
    fn test_summarize_modes() {
        let summary = summarize_modes(&[
            category("k1", "a", AssignmentMode::Random),
            category("k2", "b", AssignmentMode::Choice),
            category("k3", "c", AssignmentMode::Random),
        ]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.by_mode.get("random"), Some(&2));
        assert_eq!(summary.by_mode.get("choice"), Some(&1));
    }
}
