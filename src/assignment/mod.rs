//! Task-to-member assignment board.
//!
//! The board owns every draft task of the assignment step in an arena keyed by
//! `DraftId`. Buckets hold ids only, so a move is a pure partition change and
//! never touches the task itself. Every task id lives in exactly one bucket.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use tracing::{debug, info, warn};

use crate::errors::BoardError;
use crate::models::{DraftId, DraftTask, TeamMember};

/// Identifies a bucket: one per roster member plus the unassigned pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BucketKey {
    Unassigned,
    /// Keyed by the member's user id.
    Member(i64),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Unassigned => write!(f, "unassigned"),
            BucketKey::Member(id) => write!(f, "member {}", id),
        }
    }
}

/// Result of an auto-assignment pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub unassigned: Vec<DraftId>,
    /// One entry per roster member, including members with no tasks.
    pub members: BTreeMap<i64, Vec<DraftId>>,
    /// How many tasks landed in a member bucket.
    pub auto_assigned: usize,
}

/// Partition `tasks` by their responsible hint.
///
/// Single pass in input order. A task goes to its hinted member's bucket when
/// the hint is non-zero and names someone on the roster; otherwise it goes to
/// the unassigned bucket. An unknown hint is not an error.
pub fn auto_assign(roster: &[TeamMember], tasks: &[DraftTask]) -> Partition {
    let mut partition = Partition {
        members: roster.iter().map(|m| (m.id, Vec::new())).collect(),
        ..Default::default()
    };

    for task in tasks {
        match task.responsible_hint() {
            Some(member_id) => match partition.members.get_mut(&member_id) {
                Some(bucket) => {
                    bucket.push(task.id);
                    partition.auto_assigned += 1;
                    debug!(task = %task.id, name = %task.name, member_id, "auto-assigned");
                }
                None => {
                    warn!(
                        task = %task.id,
                        name = %task.name,
                        member_id,
                        "responsible is not on the team; leaving task unassigned"
                    );
                    partition.unassigned.push(task.id);
                }
            },
            None => partition.unassigned.push(task.id),
        }
    }

    partition
}

/// Assignment step state: roster, task arena and the current partition.
#[derive(Debug, Clone)]
pub struct AssignmentBoard {
    tasks: BTreeMap<DraftId, DraftTask>,
    /// Input order of the task list, used when recomputing the partition.
    order: Vec<DraftId>,
    roster: Vec<TeamMember>,
    partition: Partition,
}

impl AssignmentBoard {
    /// Open the board with every task unassigned and no roster yet.
    pub fn new(tasks: Vec<DraftTask>) -> Self {
        let order: Vec<DraftId> = tasks.iter().map(|t| t.id).collect();
        let partition = Partition {
            unassigned: order.clone(),
            ..Default::default()
        };
        Self {
            tasks: tasks.into_iter().map(|t| (t.id, t)).collect(),
            order,
            roster: Vec::new(),
            partition,
        }
    }

    /// Replace the roster and recompute the whole partition.
    ///
    /// Manual moves made since the last recompute are discarded. A user with
    /// several memberships keeps only the first, so each bucket appears once.
    pub fn set_roster(&mut self, roster: Vec<TeamMember>) {
        let mut seen = HashSet::new();
        self.roster = roster
            .into_iter()
            .filter(|member| {
                let first = seen.insert(member.id);
                if !first {
                    debug!(member_id = member.id, "duplicate membership ignored");
                }
                first
            })
            .collect();
        self.recompute();
    }

    /// Replace the task list and recompute the whole partition.
    pub fn replace_tasks(&mut self, tasks: Vec<DraftTask>) {
        self.order = tasks.iter().map(|t| t.id).collect();
        self.tasks = tasks.into_iter().map(|t| (t.id, t)).collect();
        self.recompute();
    }

    fn recompute(&mut self) {
        let tasks: Vec<DraftTask> = self
            .order
            .iter()
            .filter_map(|id| self.tasks.get(id).cloned())
            .collect();
        self.partition = auto_assign(&self.roster, &tasks);
        info!(
            assigned = self.partition.auto_assigned,
            unassigned = self.partition.unassigned.len(),
            "auto-assignment complete"
        );
    }

    pub fn roster(&self) -> &[TeamMember] {
        &self.roster
    }

    pub fn member(&self, member_id: i64) -> Option<&TeamMember> {
        self.roster.iter().find(|m| m.id == member_id)
    }

    pub fn task(&self, id: DraftId) -> Option<&DraftTask> {
        self.tasks.get(&id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn auto_assigned_count(&self) -> usize {
        self.partition.auto_assigned
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Ids in a bucket, in drag order. `None` for a bucket not on this board.
    pub fn bucket(&self, key: BucketKey) -> Option<&[DraftId]> {
        match key {
            BucketKey::Unassigned => Some(&self.partition.unassigned),
            BucketKey::Member(id) => self.partition.members.get(&id).map(Vec::as_slice),
        }
    }

    pub fn unassigned(&self) -> &[DraftId] {
        &self.partition.unassigned
    }

    /// Tasks of a bucket, in drag order.
    pub fn tasks_in(&self, key: BucketKey) -> Vec<&DraftTask> {
        self.bucket(key)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.tasks.get(id))
            .collect()
    }

    /// Member buckets in roster order.
    pub fn member_buckets(&self) -> impl Iterator<Item = (&TeamMember, &[DraftId])> {
        self.roster.iter().map(|member| {
            let ids = self
                .partition
                .members
                .get(&member.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            (member, ids)
        })
    }

    /// Which bucket currently holds a task.
    pub fn locate(&self, id: DraftId) -> Option<BucketKey> {
        if self.partition.unassigned.contains(&id) {
            return Some(BucketKey::Unassigned);
        }
        self.partition
            .members
            .iter()
            .find(|(_, ids)| ids.contains(&id))
            .map(|(member_id, _)| BucketKey::Member(*member_id))
    }

    /// Sum of story points in a bucket.
    pub fn story_points(&self, key: BucketKey) -> u32 {
        self.tasks_in(key).iter().map(|t| t.story_points).sum()
    }

    /// Every id held by any bucket, sorted. Duplicates would show up here.
    pub fn all_ids(&self) -> Vec<DraftId> {
        let mut ids: Vec<DraftId> = self
            .partition
            .unassigned
            .iter()
            .chain(self.partition.members.values().flatten())
            .copied()
            .collect();
        ids.sort();
        ids
    }

    /// Move a task from `from` to the end of `to`.
    ///
    /// Fails without changing anything when the task is not in `from` or `to`
    /// is not a bucket on this board.
    pub fn move_task(
        &mut self,
        id: DraftId,
        from: BucketKey,
        to: BucketKey,
    ) -> Result<(), BoardError> {
        if self.bucket(to).is_none() {
            return Err(BoardError::UnknownBucket(to));
        }
        let source = self
            .bucket_mut(from)
            .ok_or(BoardError::UnknownBucket(from))?;
        let position = source
            .iter()
            .position(|candidate| *candidate == id)
            .ok_or(BoardError::TaskNotInBucket { id, bucket: from })?;
        source.remove(position);

        self.bucket_mut(to)
            .ok_or(BoardError::UnknownBucket(to))?
            .push(id);
        debug!(task = %id, %from, %to, "task moved");
        Ok(())
    }

    fn bucket_mut(&mut self, key: BucketKey) -> Option<&mut Vec<DraftId>> {
        match key {
            BucketKey::Unassigned => Some(&mut self.partition.unassigned),
            BucketKey::Member(id) => self.partition.members.get_mut(&id),
        }
    }
}
