pub mod sqlite;

use crate::model::{
    BusinessRecord, ClassificationOverride, Cuisine, NewRecord, PriceTier, RecordId, Source,
    StorageError,
};

pub use sqlite::SqliteStorage;

/// Filtered, ordered and paginated select over effective (override-first) values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Primary or secondary cuisine.
    pub cuisine: Option<Cuisine>,
    /// Inclusion list; empty means any neighborhood.
    pub neighborhoods: Vec<String>,
    /// Records with no known price are excluded when set.
    pub max_price: Option<PriceTier>,
    /// Case-insensitive substring of the display name.
    pub name_contains: Option<String>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl RecordFilter {
    pub fn cuisine(cuisine: Cuisine) -> Self {
        Self {
            cuisine: Some(cuisine),
            ..Self::default()
        }
    }
}

/// Persistent store for business records.
///
/// `(source, external_ref)` pairs are unique across the whole store; violating
/// that surfaces as `StorageError::DuplicateExternalRef`. Writes stamp
/// `last_updated`.
pub trait RecordStore {
    fn insert(&self, record: &NewRecord) -> Result<RecordId, StorageError>;

    /// Rewrites details, the inferred tier, review flags and external refs.
    /// Overrides are left alone.
    fn update(&self, record: &BusinessRecord) -> Result<(), StorageError>;

    fn get(&self, id: RecordId) -> Result<Option<BusinessRecord>, StorageError>;

    fn find_by_external_ref(
        &self,
        source: Source,
        external_ref: &str,
    ) -> Result<Option<BusinessRecord>, StorageError>;

    /// Records whose effective neighborhood is `neighborhood`, oldest first.
    fn records_in_neighborhood(&self, neighborhood: &str) -> Result<Vec<BusinessRecord>, StorageError>;

    fn search(&self, filter: &RecordFilter) -> Result<Vec<BusinessRecord>, StorageError>;

    /// Replaces the override tier and clears the review flag.
    fn set_override(&self, id: RecordId, overrides: &ClassificationOverride) -> Result<(), StorageError>;

    fn delete(&self, id: RecordId) -> Result<(), StorageError>;

    fn records_needing_review(&self) -> Result<Vec<BusinessRecord>, StorageError>;
}
