// Human review: the review queue, override files and the Delete purge
use crate::geo::{GeoIndex, UNKNOWN_NEIGHBORHOOD};
use crate::model::{
    BusinessRecord, ClassificationOverride, Cuisine, PriceTier, RecordId, ReviewError, StorageError,
};
use crate::storage::{RecordFilter, RecordStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One line of an override file. Unset fields keep the record's current override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub id: RecordId,
    /// Informational; ignored when applying.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub primary_cuisine: Option<Cuisine>,
    #[serde(default)]
    pub secondary_cuisine: Option<Cuisine>,
    #[serde(default)]
    pub price_tier: Option<PriceTier>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    /// Marks the record with the Delete sentinel for the next purge.
    #[serde(default)]
    pub delete: bool,
}

impl OverrideEntry {
    /// Entry pre-filled with the record's effective classification, ready to edit.
    pub fn template(record: &BusinessRecord) -> Self {
        let neighborhood = record.neighborhood();
        Self {
            id: record.id,
            name: Some(record.name().to_string()),
            primary_cuisine: Some(record.primary_cuisine()),
            secondary_cuisine: record.secondary_cuisine(),
            price_tier: record.price_tier(),
            neighborhood: (neighborhood != UNKNOWN_NEIGHBORHOOD).then(|| neighborhood.to_string()),
            delete: false,
        }
    }

    fn is_empty(&self) -> bool {
        !self.delete
            && self.primary_cuisine.is_none()
            && self.secondary_cuisine.is_none()
            && self.price_tier.is_none()
            && self.neighborhood.is_none()
    }

    /// Layers this entry over `current`, resolving the neighborhood spelling.
    fn merged_over(
        &self,
        current: &ClassificationOverride,
        geo: &GeoIndex,
    ) -> Result<ClassificationOverride, ReviewError> {
        let neighborhood = match &self.neighborhood {
            Some(name) => match geo.canonical_name(name) {
                Some(canonical) => Some(canonical.to_string()),
                None => {
                    return Err(ReviewError::UnknownNeighborhood {
                        id: self.id,
                        name: name.clone(),
                    });
                }
            },
            None => current.neighborhood.clone(),
        };

        let primary_cuisine = if self.delete {
            Some(Cuisine::Delete)
        } else {
            self.primary_cuisine.or(current.primary_cuisine)
        };

        Ok(ClassificationOverride {
            primary_cuisine,
            secondary_cuisine: self.secondary_cuisine.or(current.secondary_cuisine),
            price_tier: self.price_tier.or(current.price_tier),
            neighborhood,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub applied: usize,
    pub marked_for_deletion: usize,
    pub skipped: usize,
}

/// A `needs_review` record as shown to a reviewer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewItem {
    pub id: RecordId,
    pub name: String,
    pub neighborhood: String,
    pub primary_cuisine: Cuisine,
    pub price_tier: Option<PriceTier>,
    pub reason: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl From<&BusinessRecord> for ReviewItem {
    fn from(record: &BusinessRecord) -> Self {
        Self {
            id: record.id,
            name: record.name().to_string(),
            neighborhood: record.neighborhood().to_string(),
            primary_cuisine: record.primary_cuisine(),
            price_tier: record.price_tier(),
            reason: record.review_reason.clone(),
            last_updated: record.last_updated,
        }
    }
}

pub fn load_overrides(path: impl AsRef<Path>) -> Result<Vec<OverrideEntry>, ReviewError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Writes an editable override file for the given records.
pub fn write_override_template(path: impl AsRef<Path>, records: &[BusinessRecord]) -> Result<(), ReviewError> {
    let entries: Vec<OverrideEntry> = records.iter().map(OverrideEntry::template).collect();
    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}

/// Applies one entry and clears the record's review flag.
pub fn apply_override<S: RecordStore + ?Sized>(
    store: &S,
    geo: &GeoIndex,
    entry: &OverrideEntry,
) -> Result<ClassificationOverride, ReviewError> {
    if entry.is_empty() {
        return Err(ReviewError::EmptyOverride(entry.id));
    }
    let record = store.get(entry.id)?.ok_or(StorageError::NotFound(entry.id))?;
    let merged = entry.merged_over(&record.overrides, geo)?;
    store.set_override(entry.id, &merged)?;
    Ok(merged)
}

/// Applies every entry; a bad entry is logged and skipped.
pub fn apply_overrides<S: RecordStore + ?Sized>(
    store: &S,
    geo: &GeoIndex,
    entries: &[OverrideEntry],
) -> ReviewSummary {
    let mut summary = ReviewSummary::default();
    for entry in entries {
        match apply_override(store, geo, entry) {
            Ok(applied) => {
                summary.applied += 1;
                if applied.primary_cuisine == Some(Cuisine::Delete) {
                    summary.marked_for_deletion += 1;
                }
            }
            Err(e) => {
                warn!("⚠️ Override for #{} skipped: {}", entry.id, e);
                summary.skipped += 1;
            }
        }
    }
    info!(
        "✅ Overrides: {} applied ({} marked for deletion), {} skipped",
        summary.applied, summary.marked_for_deletion, summary.skipped
    );
    summary
}

/// Deletes every record whose effective primary cuisine is the Delete sentinel.
pub fn purge_deleted<S: RecordStore + ?Sized>(store: &S) -> Result<Vec<RecordId>, StorageError> {
    let marked = store.search(&RecordFilter::cuisine(Cuisine::Delete))?;
    let mut purged = Vec::new();
    for record in marked.iter().filter(|r| r.primary_cuisine() == Cuisine::Delete) {
        store.delete(record.id)?;
        info!("🗑️ Purged #{} '{}'", record.id, record.name());
        purged.push(record.id);
    }
    Ok(purged)
}

/// Records awaiting review, optionally only those touched since `since`.
pub fn review_queue<S: RecordStore + ?Sized>(
    store: &S,
    since: Option<DateTime<Utc>>,
) -> Result<Vec<BusinessRecord>, StorageError> {
    let mut records = store.records_needing_review()?;
    if let Some(since) = since {
        records.retain(|record| record.last_updated >= since);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, NewRecord, VenueDetails};
    use crate::storage::SqliteStorage;
    use std::collections::BTreeMap;

    fn insert(store: &SqliteStorage, name: &str, neighborhood: &str, reason: Option<&str>) -> RecordId {
        store
            .insert(&NewRecord {
                details: VenueDetails {
                    name: name.to_string(),
                    ..VenueDetails::default()
                },
                inferred: Classification {
                    primary_cuisine: Cuisine::American,
                    secondary_cuisine: None,
                    price_tier: Some(PriceTier::Three),
                    neighborhood: neighborhood.to_string(),
                },
                external_refs: BTreeMap::new(),
                review_reason: reason.map(str::to_string),
            })
            .unwrap()
    }

    #[test]
    fn override_fixes_classification_and_clears_review() {
        let store = SqliteStorage::in_memory().unwrap();
        let geo = GeoIndex::default();
        let id = insert(&store, "Joe's Stone Crab", UNKNOWN_NEIGHBORHOOD, Some("neighborhood unresolved"));

        let entry = OverrideEntry {
            id,
            primary_cuisine: Some(Cuisine::Seafood),
            price_tier: Some(PriceTier::Four),
            neighborhood: Some("south beach".into()),
            ..OverrideEntry::default()
        };
        let summary = apply_overrides(&store, &geo, &[entry]);
        assert_eq!(summary, ReviewSummary { applied: 1, marked_for_deletion: 0, skipped: 0 });

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.primary_cuisine(), Cuisine::Seafood);
        assert_eq!(record.price_tier(), Some(PriceTier::Four));
        assert_eq!(record.neighborhood(), "South Beach");
        assert!(!record.needs_review);
        assert!(review_queue(&store, None).unwrap().is_empty());
    }

    #[test]
    fn later_entries_layer_over_earlier_overrides() {
        let store = SqliteStorage::in_memory().unwrap();
        let geo = GeoIndex::default();
        let id = insert(&store, "Zuma", "Downtown", None);

        apply_override(&store, &geo, &OverrideEntry { id, price_tier: Some(PriceTier::Five), ..Default::default() })
            .unwrap();
        apply_override(
            &store,
            &geo,
            &OverrideEntry { id, primary_cuisine: Some(Cuisine::Japanese), ..Default::default() },
        )
        .unwrap();

        let record = store.get(id).unwrap().unwrap();
        assert_eq!(record.price_tier(), Some(PriceTier::Five));
        assert_eq!(record.primary_cuisine(), Cuisine::Japanese);
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let store = SqliteStorage::in_memory().unwrap();
        let geo = GeoIndex::default();
        let id = insert(&store, "Zuma", "Downtown", None);

        let entries = [
            OverrideEntry { id, neighborhood: Some("Atlantis".into()), ..Default::default() },
            OverrideEntry { id, ..Default::default() },
            OverrideEntry { id: RecordId(404), primary_cuisine: Some(Cuisine::Bar), ..Default::default() },
        ];
        let summary = apply_overrides(&store, &geo, &entries);
        assert_eq!(summary.skipped, 3);
        assert!(store.get(id).unwrap().unwrap().overrides.is_empty());

        assert!(matches!(
            apply_override(&store, &geo, &entries[0]),
            Err(ReviewError::UnknownNeighborhood { .. })
        ));
        assert!(matches!(apply_override(&store, &geo, &entries[1]), Err(ReviewError::EmptyOverride(_))));
        assert!(matches!(
            apply_override(&store, &geo, &entries[2]),
            Err(ReviewError::Storage(StorageError::NotFound(RecordId(404))))
        ));
    }

    #[test]
    fn delete_then_purge() {
        let store = SqliteStorage::in_memory().unwrap();
        let geo = GeoIndex::default();
        let keep = insert(&store, "Versailles", "Little Havana", None);
        let gone = insert(&store, "Walgreens #2201", "Little Havana", None);

        let summary = apply_overrides(&store, &geo, &[OverrideEntry { id: gone, delete: true, ..Default::default() }]);
        assert_eq!(summary.marked_for_deletion, 1);

        assert_eq!(purge_deleted(&store).unwrap(), vec![gone]);
        assert!(store.get(gone).unwrap().is_none());
        assert!(store.get(keep).unwrap().is_some());
        assert!(purge_deleted(&store).unwrap().is_empty());
    }

    #[test]
    fn template_round_trips_through_a_file() {
        let store = SqliteStorage::in_memory().unwrap();
        insert(&store, "Mystery Spot", UNKNOWN_NEIGHBORHOOD, Some("neighborhood unresolved"));
        insert(&store, "Kyu", "Wynwood", Some("cuisine defaulted to American"));

        let queue = review_queue(&store, None).unwrap();
        assert_eq!(queue.len(), 2);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        write_override_template(&path, &queue).unwrap();
        let entries = load_overrides(&path).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name.as_deref(), Some("Mystery Spot"));
        assert_eq!(entries[0].neighborhood, None);
        assert_eq!(entries[1].neighborhood.as_deref(), Some("Wynwood"));
        assert_eq!(entries[1].primary_cuisine, Some(Cuisine::American));
    }

    #[test]
    fn queue_can_be_limited_by_time() {
        let store = SqliteStorage::in_memory().unwrap();
        insert(&store, "Mystery Spot", UNKNOWN_NEIGHBORHOOD, Some("neighborhood unresolved"));
        let future = Utc::now() + chrono::Duration::hours(1);
        assert!(review_queue(&store, Some(future)).unwrap().is_empty());
        assert_eq!(review_queue(&store, None).unwrap().len(), 1);
        let item = ReviewItem::from(&review_queue(&store, None).unwrap()[0]);
        assert_eq!(item.reason.as_deref(), Some("neighborhood unresolved"));
    }
}
