// Group Partitioner - shuffle, then cut into fixed-size chunks
// Every call reshuffles from scratch; there is no stability across calls.

use crate::error::GroupError;
use crate::participant::Participant;
use crate::random::IndexSource;
use crate::shuffle::shuffle;
use serde::Serialize;
use tracing::info;

/// Group size shown before the user picks one
pub const DEFAULT_GROUP_SIZE: usize = 3;

// ============================================================================
// GROUP SIZE (input boundary)
// ============================================================================

/// Group size as accepted from user input: always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSize(usize);

impl GroupSize {
    /// Clamp a numeric value to the valid range
    pub fn new(size: i64) -> Self {
        GroupSize(size.max(1) as usize)
    }

    /// Parse raw field text. Non-numeric input counts as 1.
    pub fn from_input(raw: &str) -> Self {
        GroupSize::new(raw.trim().parse::<i64>().unwrap_or(1))
    }

    pub fn get(&self) -> usize {
        self.0
    }

    pub fn increment(self) -> Self {
        GroupSize(self.0.saturating_add(1))
    }

    pub fn decrement(self) -> Self {
        GroupSize(self.0.saturating_sub(1).max(1))
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        GroupSize(DEFAULT_GROUP_SIZE)
    }
}

// ============================================================================
// PARTITION
// ============================================================================

/// Shuffle `participants` and slice into consecutive chunks of `group_size`.
/// The last chunk holds the remainder (1..group_size members).
pub fn partition<R>(
    participants: &[Participant],
    group_size: usize,
    rng: &mut R,
) -> Result<Vec<Vec<Participant>>, GroupError>
where
    R: IndexSource + ?Sized,
{
    if group_size < 1 {
        return Err(GroupError::InvalidSize(group_size));
    }

    let groups: Vec<Vec<Participant>> = shuffle(participants, rng)
        .chunks(group_size)
        .map(|chunk| chunk.to_vec())
        .collect();

    info!(
        participants = participants.len(),
        group_size,
        groups = groups.len(),
        "partitioned participants"
    );
    Ok(groups)
}

/// Result of one explicit "group" action
#[derive(Debug, Clone, Serialize)]
pub struct Grouping {
    pub group_size: usize,
    pub groups: Vec<Vec<Participant>>,
}

impl Grouping {
    pub fn generate<R>(
        participants: &[Participant],
        size: GroupSize,
        rng: &mut R,
    ) -> Result<Self, GroupError>
    where
        R: IndexSource + ?Sized,
    {
        Ok(Grouping {
            group_size: size.get(),
            groups: partition(participants, size.get(), rng)?,
        })
    }

    pub fn member_count(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_names;
    use crate::random::RngSource;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn people(n: usize) -> Vec<Participant> {
        (1..=n).map(|i| Participant::new(format!("p{}", i))).collect()
    }

    #[test]
    fn test_seven_by_three() {
        let participants = people(7);
        let mut rng = RngSource::seeded(7);

        let groups = partition(&participants, 3, &mut rng).unwrap();
        let sizes: Vec<_> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);

        let ids: HashSet<Uuid> = groups.iter().flatten().map(|p| p.id).collect();
        let expected: HashSet<Uuid> = participants.iter().map(|p| p.id).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_group_count_is_ceiling() {
        let mut rng = RngSource::seeded(1);

        for p in 1..=25 {
            let participants = people(p);
            for k in 1..=8 {
                let groups = partition(&participants, k, &mut rng).unwrap();
                assert_eq!(groups.len(), (p + k - 1) / k);

                let (last, full) = groups.split_last().unwrap();
                assert!(full.iter().all(|g| g.len() == k));
                assert!((1..=k).contains(&last.len()));

                let total: usize = groups.iter().map(Vec::len).sum();
                assert_eq!(total, p);
            }
        }
    }

    #[test]
    fn test_size_zero_rejected() {
        let mut rng = RngSource::seeded(1);
        let err = partition(&people(3), 0, &mut rng).unwrap_err();
        assert_eq!(err, GroupError::InvalidSize(0));
    }

    #[test]
    fn test_empty_list_yields_no_groups() {
        let mut rng = RngSource::seeded(1);
        assert!(partition(&[], 3, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn test_size_larger_than_list() {
        let mut rng = RngSource::seeded(1);
        let groups = partition(&people(4), 10, &mut rng).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 4);
    }

    #[test]
    fn test_duplicate_names_each_placed_once() {
        let participants = parse_names("Alice,Bob,Alice,Carol");
        let mut rng = RngSource::seeded(12);

        let groups = partition(&participants, 2, &mut rng).unwrap();
        let alices = groups
            .iter()
            .flatten()
            .filter(|p| p.name == "Alice")
            .count();
        assert_eq!(alices, 2);
    }

    #[test]
    fn test_group_size_clamps_at_boundary() {
        assert_eq!(GroupSize::new(0).get(), 1);
        assert_eq!(GroupSize::new(-4).get(), 1);
        assert_eq!(GroupSize::new(5).get(), 5);
        assert_eq!(GroupSize::from_input(" 4 ").get(), 4);
        assert_eq!(GroupSize::from_input("abc").get(), 1);
        assert_eq!(GroupSize::from_input("").get(), 1);
        assert_eq!(GroupSize::default().get(), DEFAULT_GROUP_SIZE);
    }

    #[test]
    fn test_group_size_step_never_below_one() {
        let size = GroupSize::new(1).decrement();
        assert_eq!(size.get(), 1);
        assert_eq!(size.increment().get(), 2);
    }

    #[test]
    fn test_grouping_member_count() {
        let mut rng = RngSource::seeded(2);
        let grouping = Grouping::generate(&people(10), GroupSize::new(4), &mut rng).unwrap();

        assert_eq!(grouping.group_size, 4);
        assert_eq!(grouping.groups.len(), 3);
        assert_eq!(grouping.member_count(), 10);
    }
}
