//! Gauged catchment catalog.
//!
//! The analysis only needs read access to a list of candidate catchments;
//! where they come from (JSON file, database, archive parser) is up to the
//! implementor. `InMemoryCatalog` is the implementation the loader builds.

use std::collections::HashMap;

use crate::domain::Catchment;
use crate::error::AnalysisError;

/// Read-only source of candidate donor catchments.
pub trait CatchmentCatalog {
    /// All catchments, in catalog order.
    fn all_candidates(&self) -> &[Catchment];

    fn get(&self, id: u32) -> Option<&Catchment> {
        self.all_candidates().iter().find(|c| c.id == id)
    }

    /// Catchments flagged suitable for pooling, excluding `subject_id`.
    fn pooling_candidates(&self, subject_id: u32) -> Vec<&Catchment> {
        self.all_candidates()
            .iter()
            .filter(|c| c.id != subject_id && c.is_suitable_for_pooling)
            .collect()
    }

    fn len(&self) -> usize {
        self.all_candidates().len()
    }

    fn is_empty(&self) -> bool {
        self.all_candidates().is_empty()
    }
}

/// Catalog held in memory, indexed by station id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    catchments: Vec<Catchment>,
    index: HashMap<u32, usize>,
}

impl InMemoryCatalog {
    /// Build a catalog; records are date-ordered and ids must be unique.
    pub fn new(catchments: Vec<Catchment>) -> Result<Self, AnalysisError> {
        let mut catchments = catchments;
        let mut index = HashMap::with_capacity(catchments.len());
        for (i, c) in catchments.iter_mut().enumerate() {
            c.normalize_records()?;
            if index.insert(c.id, i).is_some() {
                return Err(AnalysisError::DuplicateCatchment(c.id));
            }
        }
        Ok(Self { catchments, index })
    }

    /// Look up a catchment, failing with `UnknownCatchment`.
    pub fn require(&self, id: u32) -> Result<&Catchment, AnalysisError> {
        self.get(id).ok_or(AnalysisError::UnknownCatchment(id))
    }

    pub fn into_inner(self) -> Vec<Catchment> {
        self.catchments
    }
}

impl CatchmentCatalog for InMemoryCatalog {
    fn all_candidates(&self) -> &[Catchment] {
        &self.catchments
    }

    fn get(&self, id: u32) -> Option<&Catchment> {
        self.index.get(&id).map(|&i| &self.catchments[i])
    }
}

impl CatchmentCatalog for Vec<Catchment> {
    fn all_candidates(&self) -> &[Catchment] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: u32, suitable: bool) -> Catchment {
        let mut c = Catchment::new(id, format!("Loc {id}"), "River");
        c.is_suitable_for_pooling = suitable;
        c
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = InMemoryCatalog::new(vec![station(1, true), station(1, true)]).unwrap_err();
        assert_eq!(err, AnalysisError::DuplicateCatchment(1));
    }

    #[test]
    fn lookup_by_id() {
        let catalog = InMemoryCatalog::new(vec![station(10001, true), station(10002, false)]).unwrap();
        assert_eq!(catalog.get(10002).map(|c| c.id), Some(10002));
        assert!(catalog.get(3).is_none());
        assert_eq!(catalog.require(3).unwrap_err(), AnalysisError::UnknownCatchment(3));
    }

    #[test]
    fn pooling_candidates_skip_subject_and_unsuitable() {
        let catalog = InMemoryCatalog::new(vec![
            station(1, true),
            station(2, false),
            station(3, true),
        ])
        .unwrap();
        let ids: Vec<u32> = catalog.pooling_candidates(1).iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![3]);
    }
}
