//! 自动分组
//!
//! 小组数量为 `ceil(学生数 / 每组人数)`。随机模式先洗牌，再依次填满每个小组；
//! 自选模式只创建空组。单个小组或成员写入失败不会回滚已完成的部分。

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use super::{GroupService, membership};
use crate::models::categories::entities::{AssignmentMode, Category};
use crate::models::groups::entities::{Group, NewGroup};
use crate::models::groups::responses::PartitionReport;
use crate::storage::insert_one;
use crate::utils::WriteGate;

/// 需要的小组数量
pub fn group_count(student_count: usize, capacity: u32) -> usize {
    student_count.div_ceil(capacity.max(1) as usize)
}

/// 按顺序把学生放入小组，每组放满 `capacity` 再放下一组
///
/// 返回 (小组下标, 学生) 列表与放不下的学生数。
pub fn assign_sequentially(
    roster: &[String],
    groups: usize,
    capacity: u32,
) -> (Vec<(usize, &str)>, usize) {
    let capacity = capacity.max(1) as usize;
    let slots = groups.saturating_mul(capacity);
    let assignments = roster
        .iter()
        .take(slots)
        .enumerate()
        .map(|(position, student)| (position / capacity, student.as_str()))
        .collect();
    (assignments, roster.len().saturating_sub(slots))
}

/// 随机分组方案：洗牌后按顺序分配
pub fn plan_random_assignment<R: Rng + ?Sized>(
    roster: &[String],
    groups: usize,
    capacity: u32,
    rng: &mut R,
) -> (Vec<(usize, String)>, usize) {
    let mut shuffled = roster.to_vec();
    shuffled.shuffle(rng);
    let (assignments, unassigned) = assign_sequentially(&shuffled, groups, capacity);
    let assignments = assignments
        .into_iter()
        .map(|(index, student)| (index, student.to_string()))
        .collect();
    (assignments, unassigned)
}

pub async fn create_groups_for_category(
    service: &GroupService,
    category: &Category,
) -> PartitionReport {
    let roster = match service.enrollments().course_students(&category.course_id).await {
        Ok(roster) => roster,
        Err(e) => {
            warn!(
                "Failed to read roster of course {} for category {}: {}",
                category.course_id, category.id, e
            );
            return PartitionReport {
                failures: vec![format!("read roster: {e}")],
                ..Default::default()
            };
        }
    };

    create_groups_with_roster(service, category, roster).await
}

pub async fn create_groups_with_roster(
    service: &GroupService,
    category: &Category,
    roster: Vec<String>,
) -> PartitionReport {
    let mut report = PartitionReport::default();
    let count = group_count(roster.len(), category.capacity);
    if count == 0 {
        info!("Category {} has no students, no groups created", category.id);
        return report;
    }

    let _guard = WriteGate::global()
        .acquire(WriteGate::category_key(&category.id))
        .await;

    let prefix = &service.grouping().group_name_prefix;
    let mut groups: Vec<Group> = Vec::with_capacity(count);
    for index in 1..=count {
        let new_group = NewGroup {
            category_id: category.id.clone(),
            name: format!("{prefix} {index}"),
            description: None,
        };
        match insert_one::<Group, _>(service.storage(), &new_group).await {
            Ok(group) => {
                debug!("Created {} ({}) in category {}", group.name, group.id, category.id);
                groups.push(group);
            }
            Err(e) => {
                warn!(
                    "Failed to create {} in category {}: {}",
                    new_group.name, category.id, e
                );
                report.failures.push(format!("create {}: {e}", new_group.name));
            }
        }
    }
    report.groups_created = groups.len();

    if category.mode == AssignmentMode::Choice {
        report.students_unassigned = roster.len();
        info!(
            "Created {} empty group(s) for choice category {}",
            report.groups_created, category.id
        );
        return report;
    }

    let (assignments, unassigned) =
        plan_random_assignment(&roster, groups.len(), category.capacity, &mut rand::rng());
    report.students_unassigned = unassigned;
    if unassigned > 0 {
        warn!(
            "{} student(s) of category {} did not fit into the created groups",
            unassigned, category.id
        );
    }

    for (index, student_id) in assignments {
        let group = &groups[index];
        match membership::insert_membership(service, &group.id, &student_id).await {
            Ok(_) => report.students_assigned += 1,
            Err(e) => {
                warn!(
                    "Failed to assign student {} to {} ({}): {}",
                    student_id, group.name, group.id, e
                );
                report
                    .failures
                    .push(format!("assign {student_id} to {}: {e}", group.name));
                report.students_unassigned += 1;
            }
        }
    }

    info!(
        "Partitioned category {}: {} group(s), {} assigned, {} unassigned, {} failure(s)",
        category.id,
        report.groups_created,
        report.students_assigned,
        report.students_unassigned,
        report.failures.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::groups::entities::GroupMembership;
    use crate::storage::memory_storage::MemoryStorage;
    use crate::storage::testing::{FlakyStorage, seed};
    use crate::storage::{Collection, load_all};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    fn category(id: &str, mode: AssignmentMode, capacity: u32) -> Category {
        Category {
            id: id.to_string(),
            course_id: "course-1".to_string(),
            name: "Project".to_string(),
            mode,
            capacity,
            description: None,
        }
    }

    fn roster(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("s{i}")).collect()
    }

    #[test]
    fn test_group_count_is_ceiling() {
        assert_eq!(group_count(0, 5), 0);
        assert_eq!(group_count(1, 5), 1);
        assert_eq!(group_count(5, 5), 1);
        assert_eq!(group_count(6, 5), 2);
        assert_eq!(group_count(23, 4), 6);
        assert_eq!(group_count(3, 1), 3);
        for n in 0..40 {
            for c in 1..8u32 {
                let groups = group_count(n, c);
                assert!(groups * c as usize >= n);
                assert!(groups == 0 || (groups - 1) * (c as usize) < n);
            }
        }
    }

    #[test]
    fn test_assign_sequentially_fills_in_order() {
        let students = roster(7);
        let (assignments, unassigned) = assign_sequentially(&students, 2, 3);
        let indices: Vec<usize> = assignments.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 0, 0, 1, 1, 1]);
        assert_eq!(assignments[3].1, "s4");
        assert_eq!(unassigned, 1);
    }

    #[test]
    fn test_random_plan_places_everyone_once() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in [0usize, 1, 4, 9, 10, 31] {
            let students = roster(n);
            let groups = group_count(n, 4);
            let (assignments, unassigned) = plan_random_assignment(&students, groups, 4, &mut rng);
            assert_eq!(unassigned, 0);
            assert_eq!(assignments.len(), n);

            let unique: HashSet<&str> = assignments.iter().map(|(_, s)| s.as_str()).collect();
            assert_eq!(unique.len(), n);

            let mut sizes: HashMap<usize, usize> = HashMap::new();
            for (index, _) in &assignments {
                *sizes.entry(*index).or_default() += 1;
            }
            assert!(sizes.values().all(|size| *size <= 4));
        }
    }

    #[tokio::test]
    async fn test_random_category_is_fully_partitioned() {
        let store = Arc::new(MemoryStorage::new());
        let service = GroupService::new(store.clone());
        let category = category("cat-random", AssignmentMode::Random, 3);

        let report = service.create_groups_with_roster(&category, roster(7)).await;
        assert_eq!(
            report,
            PartitionReport {
                groups_created: 3,
                students_assigned: 7,
                students_unassigned: 0,
                failures: vec![],
            }
        );
        assert!(report.is_complete());

        let groups: Vec<Group> = load_all(store.as_ref()).await.unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Group 1", "Group 2", "Group 3"]);

        let members: Vec<GroupMembership> = load_all(store.as_ref()).await.unwrap();
        let students: HashSet<&str> = members.iter().map(|m| m.student_id.as_str()).collect();
        assert_eq!(students.len(), 7);
        for group in &groups {
            let size = members.iter().filter(|m| m.group_id == group.id).count();
            assert!(size <= 3);
        }
    }

    #[tokio::test]
    async fn test_choice_category_gets_empty_groups() {
        let store = Arc::new(MemoryStorage::new());
        let service = GroupService::new(store.clone());
        let category = category("cat-choice", AssignmentMode::Choice, 5);

        let report = service.create_groups_with_roster(&category, roster(11)).await;
        assert_eq!(report.groups_created, 3);
        assert_eq!(report.students_assigned, 0);
        assert_eq!(store.count(Collection::Groups), 3);
        assert_eq!(store.count(Collection::GroupMembers), 0);
    }

    #[tokio::test]
    async fn test_empty_roster_creates_nothing() {
        let store = Arc::new(MemoryStorage::new());
        let service = GroupService::new(store.clone());
        let category = category("cat-empty", AssignmentMode::Random, 5);

        let report = service.create_groups_for_category(&category).await;
        assert_eq!(report, PartitionReport::default());
        assert_eq!(store.count(Collection::Groups), 0);
    }

    #[tokio::test]
    async fn test_roster_is_read_from_enrollments() {
        let store = Arc::new(MemoryStorage::new());
        seed(
            store.as_ref(),
            Collection::Enrollments,
            vec![
                json!({"course_id": "course-1", "student_id": "a", "role": "student"}),
                json!({"course_id": "course-1", "student_id": "b", "role": "student"}),
                json!({"course_id": "course-1", "student_id": "p", "role": "professor"}),
                json!({"course_id": "course-2", "student_id": "c", "role": "student"}),
            ],
        )
        .await;
        let service = GroupService::new(store.clone());

        let report = service
            .create_groups_for_category(&category("cat-2", AssignmentMode::Random, 1))
            .await;
        assert_eq!(report.groups_created, 2);
        assert_eq!(report.students_assigned, 2);
    }

    #[tokio::test]
    async fn test_failed_group_does_not_roll_back_others() {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        store.fail_insert(Collection::Groups, 2);
        let service = GroupService::new(store.clone());
        let category = category("cat-flaky", AssignmentMode::Random, 3);

        let report = service.create_groups_with_roster(&category, roster(7)).await;
        assert_eq!(report.groups_created, 2);
        assert_eq!(report.students_assigned, 6);
        assert_eq!(report.students_unassigned, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("Group 2"));
        assert!(!report.is_complete());

        let groups: Vec<Group> = load_all(store.as_ref()).await.unwrap();
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Group 1", "Group 3"]);
    }

    #[tokio::test]
    async fn test_failed_membership_is_reported() {
        let store = Arc::new(FlakyStorage::new(MemoryStorage::new()));
        store.fail_insert(Collection::GroupMembers, 1);
        let service = GroupService::new(store.clone());
        let category = category("cat-members", AssignmentMode::Random, 2);

        let report = service.create_groups_with_roster(&category, roster(4)).await;
        assert_eq!(report.groups_created, 2);
        assert_eq!(report.students_assigned, 3);
        assert_eq!(report.students_unassigned, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(store.inner.count(Collection::GroupMembers), 3);
    }
}
