use crate::geo::UNKNOWN_NEIGHBORHOOD;
use crate::matcher::similarity::similarity;
use crate::model::{BusinessRecord, Candidate, StorageError};
use crate::storage::RecordStore;
use tracing::debug;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateCheck {
    /// The candidate's (source, external ref) is already stored.
    ExternalRef(BusinessRecord),
    /// A record in the same neighborhood has a name above the threshold.
    SimilarName { record: BusinessRecord, score: f64 },
    Distinct,
}

#[derive(Debug, Clone, Copy)]
pub struct DuplicateMatcher {
    threshold: f64,
}

impl DuplicateMatcher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn is_same_name(&self, a: &str, b: &str) -> bool {
        similarity(a, b) > self.threshold
    }

    /// First record (in the given order) whose name scores above the threshold.
    /// Records already carrying a different ref from the candidate's source
    /// are distinct venues by definition and are skipped.
    pub fn find_similar<'a>(
        &self,
        candidate: &Candidate,
        records: &'a [BusinessRecord],
    ) -> Option<(&'a BusinessRecord, f64)> {
        records
            .iter()
            .filter(|record| match (&candidate.external_ref, record.external_refs.get(&candidate.source)) {
                (Some(ours), Some(theirs)) => ours == theirs,
                _ => true,
            })
            .find(|record| self.is_same_name(&candidate.name, record.name()))
            .map(|record| (record, similarity(&candidate.name, record.name())))
    }

    /// External ref lookup, then a name comparison against records in
    /// `neighborhood`. Unresolved neighborhoods skip the name comparison.
    pub fn check<S: RecordStore + ?Sized>(
        &self,
        store: &S,
        candidate: &Candidate,
        neighborhood: &str,
    ) -> Result<DuplicateCheck, StorageError> {
        if let Some(external_ref) = candidate.external_ref.as_deref() {
            if let Some(record) = store.find_by_external_ref(candidate.source, external_ref)? {
                debug!("{}:{} already stored as #{}", candidate.source, external_ref, record.id);
                return Ok(DuplicateCheck::ExternalRef(record));
            }
        }

        if neighborhood == UNKNOWN_NEIGHBORHOOD {
            return Ok(DuplicateCheck::Distinct);
        }

        let records = store.records_in_neighborhood(neighborhood)?;
        Ok(match self.find_similar(candidate, &records) {
            Some((record, score)) => {
                debug!(
                    "'{}' matches #{} '{}' in {} ({:.2})",
                    candidate.name,
                    record.id,
                    record.name(),
                    neighborhood,
                    score
                );
                DuplicateCheck::SimilarName {
                    record: record.clone(),
                    score,
                }
            }
            None => DuplicateCheck::Distinct,
        })
    }
}

impl Default for DuplicateMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}
