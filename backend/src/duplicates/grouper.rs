use crate::db::places::DuplicateCandidate;
use common::model::duplicates::{DuplicateGroup, DuplicatePlace, DuplicateReport};
use std::cmp::Reverse;
use std::collections::HashMap;

/// Chooses which member of a duplicate group survives.
pub trait KeepPolicy: Send + Sync {
    /// `members` holds at least two places in creation order; the returned
    /// index must be in bounds.
    fn keep_index(&self, members: &[DuplicateCandidate]) -> usize;
}

/// Keeps the earliest created record.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOldest;

impl KeepPolicy for KeepOldest {
    fn keep_index(&self, _members: &[DuplicateCandidate]) -> usize {
        0
    }
}

/// Keeps the record with the most reviews; the oldest wins a tie.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepMostReviewed;

impl KeepPolicy for KeepMostReviewed {
    fn keep_index(&self, members: &[DuplicateCandidate]) -> usize {
        members
            .iter()
            .enumerate()
            .min_by_key(|(index, member)| (Reverse(member.reviews), *index))
            .map_or(0, |(index, _)| index)
    }
}

/// Groups places sharing a `cid`.
///
/// `candidates` must be in creation order. Members keep that order, and groups
/// are listed in the order of their oldest member. Singletons are dropped.
pub fn group_duplicates(
    candidates: Vec<DuplicateCandidate>,
    policy: &dyn KeepPolicy,
) -> DuplicateReport {
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<Vec<DuplicateCandidate>> = Vec::new();

    for candidate in candidates {
        match slots.get(&candidate.cid) {
            Some(&slot) => buckets[slot].push(candidate),
            None => {
                slots.insert(candidate.cid.clone(), buckets.len());
                buckets.push(vec![candidate]);
            }
        }
    }

    let groups: Vec<DuplicateGroup> = buckets
        .into_iter()
        .filter(|members| members.len() > 1)
        .map(|members| build_group(members, policy))
        .collect();

    DuplicateReport {
        total_duplicate_groups: groups.len(),
        total_places_to_remove: groups.iter().map(|g| g.remove_ids.len()).sum(),
        groups,
    }
}

fn build_group(members: Vec<DuplicateCandidate>, policy: &dyn KeepPolicy) -> DuplicateGroup {
    let keep = policy.keep_index(&members).min(members.len() - 1);
    let keep_id = members[keep].id.clone();
    let remove_ids = members
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != keep)
        .map(|(_, member)| member.id.clone())
        .collect();

    DuplicateGroup {
        cid: members[0].cid.clone(),
        count: members.len(),
        keep_id,
        remove_ids,
        places: members
            .into_iter()
            .map(|member| DuplicatePlace {
                id: member.id,
                place_id: member.place_id,
                title: member.title,
                created_at: member.created_at,
            })
            .collect(),
    }
}
