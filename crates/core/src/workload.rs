//! Round-robin least-loaded assignment planning.
//!
//! Produces an assignment plan over a snapshot of unassigned complaints and
//! the current admin roster. No database access; the caller fetches the
//! snapshot, applies the plan as independent updates, and reports partial
//! success itself.

use serde::Serialize;

use crate::complaint::Urgency;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A complaint as seen by the distributor.
#[derive(Debug, Clone)]
pub struct WorkloadItem {
    pub complaint_id: DbId,
    pub urgency: Urgency,
    pub assigned_to: Option<DbId>,
}

/// A roster entry with its current load.
///
/// `assigned_count` is always recomputed from the complaint table on read,
/// never maintained as a running counter.
#[derive(Debug, Clone)]
pub struct RosterMember {
    pub admin_id: DbId,
    pub assigned_count: i64,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// One planned `(complaint, assignee)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub complaint_id: DbId,
    pub assignee_id: DbId,
}

/// Why a plan is empty (or not). These are expected conditions the caller
/// branches on, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceOutcome {
    /// At least one assignment was planned.
    Planned,
    /// No admins available to assign to.
    EmptyRoster,
    /// Every complaint is already assigned or below the urgency floor.
    NothingToAssign,
}

/// The full assignment plan for one balancing pass.
#[derive(Debug, Clone, Serialize)]
pub struct BalancePlan {
    pub outcome: BalanceOutcome,
    pub assignments: Vec<Assignment>,
    /// Number of complaints that were eligible for assignment.
    pub eligible_count: usize,
    pub roster_size: usize,
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Whether a complaint should be picked up by auto-assignment.
///
/// Already-assigned complaints are left alone; low-urgency work is not
/// auto-routed.
pub fn is_eligible(item: &WorkloadItem) -> bool {
    item.assigned_to.is_none() && item.urgency != Urgency::Low
}

/// Build a round-robin assignment plan.
///
/// The roster is sorted ascending by current load (stable, so ties keep
/// roster order) and eligible complaints are dealt out in input order:
/// complaint *i* goes to `sorted[i % n]`. This is a single static pass over
/// a snapshot; it does not reconsider in-flight assignments and is not
/// weighted by urgency beyond the eligibility filter.
pub fn balance_workload(items: &[WorkloadItem], roster: &[RosterMember]) -> BalancePlan {
    let eligible: Vec<&WorkloadItem> = items.iter().filter(|i| is_eligible(i)).collect();

    if eligible.is_empty() {
        return BalancePlan {
            outcome: BalanceOutcome::NothingToAssign,
            assignments: Vec::new(),
            eligible_count: 0,
            roster_size: roster.len(),
        };
    }

    if roster.is_empty() {
        return BalancePlan {
            outcome: BalanceOutcome::EmptyRoster,
            assignments: Vec::new(),
            eligible_count: eligible.len(),
            roster_size: 0,
        };
    }

    let mut sorted: Vec<&RosterMember> = roster.iter().collect();
    sorted.sort_by_key(|m| m.assigned_count);

    let assignments = eligible
        .iter()
        .enumerate()
        .map(|(i, item)| Assignment {
            complaint_id: item.complaint_id,
            assignee_id: sorted[i % sorted.len()].admin_id,
        })
        .collect();

    BalancePlan {
        outcome: BalanceOutcome::Planned,
        assignments,
        eligible_count: eligible.len(),
        roster_size: roster.len(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn item(id: DbId, urgency: Urgency) -> WorkloadItem {
        WorkloadItem {
            complaint_id: id,
            urgency,
            assigned_to: None,
        }
    }

    fn admin(id: DbId, load: i64) -> RosterMember {
        RosterMember {
            admin_id: id,
            assigned_count: load,
        }
    }

    // -- Eligibility ----------------------------------------------------------

    #[test]
    fn low_urgency_is_not_eligible() {
        assert!(!is_eligible(&item(1, Urgency::Low)));
    }

    #[test]
    fn already_assigned_is_not_eligible() {
        let mut i = item(1, Urgency::High);
        i.assigned_to = Some(42);
        assert!(!is_eligible(&i));
    }

    #[test]
    fn unassigned_medium_is_eligible() {
        assert!(is_eligible(&item(1, Urgency::Medium)));
    }

    // -- Empty inputs ---------------------------------------------------------

    #[test]
    fn empty_roster_reports_flag() {
        let items = vec![item(1, Urgency::High)];
        let plan = balance_workload(&items, &[]);
        assert_eq!(plan.outcome, BalanceOutcome::EmptyRoster);
        assert!(plan.assignments.is_empty());
        assert_eq!(plan.eligible_count, 1);
        assert_eq!(plan.roster_size, 0);
    }

    #[test]
    fn nothing_eligible_reports_flag() {
        let mut assigned = item(1, Urgency::High);
        assigned.assigned_to = Some(7);
        let items = vec![assigned, item(2, Urgency::Low)];
        let plan = balance_workload(&items, &[admin(7, 0)]);
        assert_eq!(plan.outcome, BalanceOutcome::NothingToAssign);
        assert!(plan.assignments.is_empty());
    }

    #[test]
    fn all_empty_reports_nothing_to_assign() {
        let plan = balance_workload(&[], &[]);
        assert_eq!(plan.outcome, BalanceOutcome::NothingToAssign);
    }

    // -- Round-robin distribution ---------------------------------------------

    #[test]
    fn ten_items_three_admins_balances_4_3_3() {
        let items: Vec<WorkloadItem> = (1..=10).map(|i| item(i, Urgency::High)).collect();
        let roster = vec![admin(101, 0), admin(102, 0), admin(103, 0)];

        let plan = balance_workload(&items, &roster);
        assert_eq!(plan.outcome, BalanceOutcome::Planned);
        assert_eq!(plan.assignments.len(), 10);

        // Every complaint appears exactly once.
        let mut ids: Vec<DbId> = plan.assignments.iter().map(|a| a.complaint_id).collect();
        ids.sort();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());

        // Loads end up [4, 3, 3].
        let mut loads: HashMap<DbId, i64> = HashMap::new();
        for a in &plan.assignments {
            *loads.entry(a.assignee_id).or_insert(0) += 1;
        }
        let mut counts: Vec<i64> = loads.values().copied().collect();
        counts.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(counts, vec![4, 3, 3]);
    }

    #[test]
    fn max_and_min_load_differ_by_at_most_one() {
        let items: Vec<WorkloadItem> = (1..=17).map(|i| item(i, Urgency::Urgent)).collect();
        let roster: Vec<RosterMember> = (1..=5).map(|i| admin(100 + i, 0)).collect();

        let plan = balance_workload(&items, &roster);
        let mut loads: HashMap<DbId, i64> = roster.iter().map(|m| (m.admin_id, 0)).collect();
        for a in &plan.assignments {
            *loads.get_mut(&a.assignee_id).unwrap() += 1;
        }
        let max = loads.values().max().unwrap();
        let min = loads.values().min().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn least_loaded_admin_is_dealt_to_first() {
        let items = vec![item(1, Urgency::High)];
        let roster = vec![admin(101, 5), admin(102, 1), admin(103, 3)];

        let plan = balance_workload(&items, &roster);
        assert_eq!(plan.assignments[0].assignee_id, 102);
    }

    #[test]
    fn load_ties_keep_roster_order() {
        let items = vec![item(1, Urgency::High), item(2, Urgency::High)];
        let roster = vec![admin(201, 2), admin(202, 2)];

        let plan = balance_workload(&items, &roster);
        assert_eq!(plan.assignments[0].assignee_id, 201);
        assert_eq!(plan.assignments[1].assignee_id, 202);
    }

    #[test]
    fn excluded_items_never_appear_in_plan() {
        let mut taken = item(3, Urgency::Urgent);
        taken.assigned_to = Some(9);
        let items = vec![item(1, Urgency::High), item(2, Urgency::Low), taken];
        let roster = vec![admin(101, 0)];

        let plan = balance_workload(&items, &roster);
        let planned: Vec<DbId> = plan.assignments.iter().map(|a| a.complaint_id).collect();
        assert_eq!(planned, vec![1]);
    }
}
