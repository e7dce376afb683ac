// SPDX-License-Identifier: MIT

//! Property-based tests for the task authorization rule.
//!
//! The rule under test: a task can be modified by its creator, or by any
//! current member of its owning team, and by absolutely nobody else. The
//! properties drive random rosters and assignee lists through the predicate
//! and its recipient-resolution twin.

use chrono::Utc;
use proptest::prelude::*;
use taskboard::authz::can_modify_task;
use taskboard::models::{Priority, Task, TaskId, TaskStatus, Team, UserId};
use taskboard::recipients;

/// Fixed pool size; masks select subsets out of it.
const POOL: usize = 8;

fn pool() -> Vec<UserId> {
    (0..POOL).map(|_| UserId::new()).collect()
}

fn subset(pool: &[UserId], mask: u8) -> Vec<UserId> {
    pool.iter()
        .enumerate()
        .filter(|(i, _)| mask & (1 << i) != 0)
        .map(|(_, id)| *id)
        .collect()
}

fn task_for(creator: UserId, team: Option<&Team>, assignees: Vec<UserId>) -> Task {
    Task {
        id: TaskId::new(),
        text: "probe".into(),
        description: None,
        user: creator,
        team: team.map(|t| t.id),
        assignees,
        priority: Priority::default(),
        due_date: Utc::now(),
        status: TaskStatus::default(),
        is_personal: team.is_none(),
        is_completed: false,
        created_at: Utc::now(),
    }
}

proptest! {
    /// Creator-or-member is exactly the set of allowed modifiers; assignment
    /// alone never grants edit rights.
    #[test]
    fn modify_rights_are_creator_or_member_only(
        actor_idx in 0..POOL,
        creator_idx in 0..POOL,
        owner_idx in 0..POOL,
        member_mask in any::<u8>(),
        assignee_mask in any::<u8>(),
    ) {
        let pool = pool();
        let actor = pool[actor_idx];
        let creator = pool[creator_idx];

        let mut team = Team::new("probe".into(), pool[owner_idx]);
        for id in subset(&pool, member_mask) {
            if !team.is_member(id) {
                team.members.push(id);
            }
        }
        let task = task_for(creator, Some(&team), subset(&pool, assignee_mask));

        let expected = actor == creator || team.is_member(actor);
        prop_assert_eq!(can_modify_task(actor, &task, Some(&team)), expected);
    }

    /// On a personal task only the creator may act, whatever the assignee
    /// list claims.
    #[test]
    fn personal_tasks_obey_only_their_creator(
        actor_idx in 0..POOL,
        creator_idx in 0..POOL,
        assignee_mask in any::<u8>(),
    ) {
        let pool = pool();
        let actor = pool[actor_idx];
        let creator = pool[creator_idx];
        let task = task_for(creator, None, subset(&pool, assignee_mask));

        prop_assert_eq!(can_modify_task(actor, &task, None), actor == creator);
    }

    /// Task-change recipients are exactly assignees ∪ members ∪ {actor}.
    #[test]
    fn task_change_recipients_are_the_exact_union(
        actor_idx in 0..POOL,
        creator_idx in 0..POOL,
        owner_idx in 0..POOL,
        member_mask in any::<u8>(),
        assignee_mask in any::<u8>(),
    ) {
        let pool = pool();
        let actor = pool[actor_idx];

        let mut team = Team::new("probe".into(), pool[owner_idx]);
        for id in subset(&pool, member_mask) {
            if !team.is_member(id) {
                team.members.push(id);
            }
        }
        let task = task_for(pool[creator_idx], Some(&team), subset(&pool, assignee_mask));

        let resolved = recipients::task_change(&task, Some(&team), actor);

        let mut expected: std::collections::HashSet<UserId> =
            task.assignees.iter().copied().collect();
        expected.extend(team.members.iter().copied());
        expected.insert(actor);

        prop_assert_eq!(resolved, expected);
    }
}
