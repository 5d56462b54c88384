//! The ordered, immutable criteria catalog

use super::dimension::{Dimension, Tier};
use super::entities::{Criterion, CriterionId};
use crate::assessment::value_objects::MAX_SCORE;
use crate::core::error::DomainError;
use std::collections::HashMap;

/// Ordered list of criteria, indexed by id and by dimension.
///
/// Declaration order is the asking order. The catalog is built once and
/// shared (usually behind an `Arc`) by the state machine and the scoring
/// engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    criteria: Vec<Criterion>,
    by_id: HashMap<CriterionId, usize>,
    /// Position of the first criterion of each dimension.
    dimension_starts: [Option<usize>; 6],
    /// Criteria count per dimension.
    dimension_sizes: [usize; 6],
}

impl Catalog {
    /// Build a catalog, validating every criterion and id uniqueness.
    pub fn new(criteria: Vec<Criterion>) -> Result<Self, DomainError> {
        if criteria.is_empty() {
            return Err(DomainError::EmptyCatalog);
        }

        let mut by_id = HashMap::with_capacity(criteria.len());
        let mut dimension_starts = [None; 6];
        let mut dimension_sizes = [0usize; 6];

        for (index, criterion) in criteria.iter().enumerate() {
            criterion.validate()?;
            if by_id.insert(criterion.id.clone(), index).is_some() {
                return Err(DomainError::DuplicateCriterion(criterion.id.to_string()));
            }
            let slot = criterion.dimension.index();
            dimension_starts[slot].get_or_insert(index);
            dimension_sizes[slot] += 1;
        }

        Ok(Self {
            criteria,
            by_id,
            dimension_starts,
            dimension_sizes,
        })
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Criterion at a sequence position.
    pub fn get(&self, index: usize) -> Option<&Criterion> {
        self.criteria.get(index)
    }

    pub fn find(&self, id: &CriterionId) -> Option<&Criterion> {
        self.position(id).map(|i| &self.criteria[i])
    }

    pub fn position(&self, id: &CriterionId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Position of the first criterion of `dimension`.
    pub fn first_of_dimension(&self, dimension: Dimension) -> Option<usize> {
        self.dimension_starts[dimension.index()]
    }

    /// Position of the first criterion of the dimension after the one
    /// containing `index`, skipping dimensions with no criteria.
    pub fn next_dimension_start(&self, index: usize) -> Option<usize> {
        let mut dimension = self.get(index)?.dimension.next();
        while let Some(d) = dimension {
            if let Some(start) = self.first_of_dimension(d) {
                return Some(start);
            }
            dimension = d.next();
        }
        None
    }

    /// Whether `index` is the last criterion of its (dimension, tier) group.
    pub fn is_last_of_tier(&self, index: usize) -> bool {
        let Some(current) = self.get(index) else {
            return false;
        };
        !self.criteria[index + 1..]
            .iter()
            .any(|c| c.dimension == current.dimension && c.tier == current.tier)
    }

    pub fn criteria_in(&self, dimension: Dimension, tier: Tier) -> impl Iterator<Item = &Criterion> {
        self.criteria
            .iter()
            .filter(move |c| c.dimension == dimension && c.tier == tier)
    }

    pub fn dimension_size(&self, dimension: Dimension) -> usize {
        self.dimension_sizes[dimension.index()]
    }

    /// Maximum attainable raw score for a dimension.
    ///
    /// Derived from the catalog shape: 36 for the standard grid of
    /// 4 tiers x 3 criteria x score 3.
    pub fn max_raw_score(&self, dimension: Dimension) -> u32 {
        self.dimension_size(dimension) as u32 * MAX_SCORE as u32
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::regular_catalog;
    use super::*;

    #[test]
    fn test_regular_catalog_shape() {
        let catalog = regular_catalog(3);
        assert_eq!(catalog.len(), 72);
        for dimension in Dimension::ALL {
            assert_eq!(catalog.dimension_size(dimension), 12);
            assert_eq!(catalog.max_raw_score(dimension), 36);
        }
    }

    #[test]
    fn test_first_of_dimension_is_constant_lookup() {
        let catalog = regular_catalog(3);
        assert_eq!(catalog.first_of_dimension(Dimension::Strategy), Some(0));
        assert_eq!(catalog.first_of_dimension(Dimension::CultureAndPeople), Some(12));
        assert_eq!(catalog.first_of_dimension(Dimension::Security), Some(60));
    }

    #[test]
    fn test_next_dimension_start() {
        let catalog = regular_catalog(3);
        assert_eq!(catalog.next_dimension_start(2), Some(12));
        assert_eq!(catalog.next_dimension_start(13), Some(24));
        assert_eq!(catalog.next_dimension_start(61), None);
        assert_eq!(catalog.next_dimension_start(500), None);
    }

    #[test]
    fn test_next_dimension_start_skips_empty_dimensions() {
        let catalog = Catalog::new(vec![
            Criterion::new("D1-P1-C1", Dimension::Strategy, Tier::FIRST, "a"),
            Criterion::new("D4-P1-C1", Dimension::Process, Tier::FIRST, "b"),
        ])
        .unwrap();
        assert_eq!(catalog.next_dimension_start(0), Some(1));
        assert_eq!(catalog.max_raw_score(Dimension::CultureAndPeople), 0);
    }

    #[test]
    fn test_is_last_of_tier() {
        let catalog = regular_catalog(3);
        assert!(!catalog.is_last_of_tier(0));
        assert!(!catalog.is_last_of_tier(1));
        assert!(catalog.is_last_of_tier(2));
        assert!(catalog.is_last_of_tier(71));
        assert!(!catalog.is_last_of_tier(72));
    }

    #[test]
    fn test_find_and_position() {
        let catalog = regular_catalog(3);
        let id = CriterionId::new("D2-P1-C3");
        assert_eq!(catalog.position(&id), Some(14));
        assert_eq!(catalog.find(&id).unwrap().dimension, Dimension::CultureAndPeople);
        assert!(catalog.find(&CriterionId::new("D9-P1-C1")).is_none());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        assert_eq!(Catalog::new(vec![]).unwrap_err(), DomainError::EmptyCatalog);
        let dup = vec![
            Criterion::new("D1-P1-C1", Dimension::Strategy, Tier::FIRST, "a"),
            Criterion::new("D1-P1-C1", Dimension::Strategy, Tier::FIRST, "b"),
        ];
        assert!(matches!(
            Catalog::new(dup),
            Err(DomainError::DuplicateCriterion(_))
        ));
    }

    #[test]
    fn test_criteria_in_tier() {
        let catalog = regular_catalog(3);
        let tier2 = Tier::new(2).unwrap();
        let ids: Vec<_> = catalog
            .criteria_in(Dimension::Technology, tier2)
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(ids, vec!["D5-P2-C1", "D5-P2-C2", "D5-P2-C3"]);
    }
}
