// Candidate stream -> quality filter -> duplicate check -> classify -> store
use crate::classifier::{ClassificationInput, CuisineMatch, TextClassifier};
use crate::config::{AppConfig, QualityPolicy};
use crate::geo::{GeoIndex, NeighborhoodMatch};
use crate::matcher::{DuplicateCheck, DuplicateMatcher};
use crate::model::{
    BusinessRecord, Candidate, Classification, Cuisine, NewRecord, PipelineError, PriceTier,
    RecordId, Source, StorageError, VenueDetails,
};
use crate::normalizer::canonicalize_name;
use crate::provider::CandidateSource;
use crate::storage::RecordStore;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Terminal state of one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected(String),
    SkippedDuplicate(RecordId),
    Inserted(RecordId),
    Updated(RecordId),
    FlaggedForReview(RecordId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub fetched: usize,
    pub rejected: usize,
    pub skipped_duplicates: usize,
    pub inserted: usize,
    pub updated: usize,
    pub flagged: usize,
    pub failed: usize,
    pub failed_sources: usize,
}

impl RunStats {
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Rejected(_) => self.rejected += 1,
            Outcome::SkippedDuplicate(_) => self.skipped_duplicates += 1,
            Outcome::Inserted(_) => self.inserted += 1,
            Outcome::Updated(_) => self.updated += 1,
            Outcome::FlaggedForReview(_) => self.flagged += 1,
        }
    }

    /// Candidates that reached a terminal state or failed.
    pub fn processed(&self) -> usize {
        self.rejected + self.skipped_duplicates + self.inserted + self.updated + self.flagged + self.failed
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {}, inserted {}, updated {}, flagged {}, duplicates {}, rejected {}, failed {} ({} sources failed)",
            self.fetched,
            self.inserted,
            self.updated,
            self.flagged,
            self.skipped_duplicates,
            self.rejected,
            self.failed,
            self.failed_sources
        )
    }
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub default_cuisine: Cuisine,
    pub request_delay: Duration,
    pub quality: HashMap<Source, QualityPolicy>,
}

impl PipelineSettings {
    /// Policy for `source`; unconfigured sources accept everything.
    pub fn quality_for(&self, source: Source) -> QualityPolicy {
        self.quality.get(&source).copied().unwrap_or_default()
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            default_cuisine: Cuisine::American,
            request_delay: Duration::ZERO,
            quality: HashMap::new(),
        }
    }
}

impl From<&AppConfig> for PipelineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_cuisine: config.pipeline.default_cuisine,
            request_delay: Duration::from_millis(config.pipeline.request_delay_ms),
            quality: config.quality.clone(),
        }
    }
}

pub struct Pipeline<S: RecordStore> {
    store: S,
    geo: GeoIndex,
    classifier: TextClassifier,
    matcher: DuplicateMatcher,
    settings: PipelineSettings,
}

impl<S: RecordStore> Pipeline<S> {
    pub fn new(
        store: S,
        geo: GeoIndex,
        classifier: TextClassifier,
        matcher: DuplicateMatcher,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            store,
            geo,
            classifier,
            matcher,
            settings,
        }
    }

    pub fn from_config(store: S, config: &AppConfig) -> Self {
        Self::new(
            store,
            GeoIndex::miami(config.matching.neighborhood_radius_miles),
            TextClassifier::standard(),
            DuplicateMatcher::new(config.matching.similarity_threshold),
            PipelineSettings::from(config),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn geo(&self) -> &GeoIndex {
        &self.geo
    }

    /// Runs every provider in order. A provider that fails to fetch is logged and skipped.
    pub async fn run(&self, providers: &[Box<dyn CandidateSource>]) -> RunStats {
        let mut stats = RunStats::default();
        for provider in providers {
            self.run_source(provider.as_ref(), &mut stats).await;
        }
        info!("🏁 Run finished: {}", stats);
        stats
    }

    pub async fn run_source(&self, provider: &dyn CandidateSource, stats: &mut RunStats) {
        info!("📥 Fetching {} candidates from {}", provider.source(), provider.describe());
        match provider.fetch().await {
            Ok(candidates) => self.process_batch(candidates, stats).await,
            Err(e) => {
                warn!("⚠️ Skipping {}: {}", provider.describe(), e);
                stats.failed_sources += 1;
            }
        }
    }

    /// Processes candidates in order with a fixed delay between them.
    /// Per-candidate failures are counted and logged; the batch continues.
    pub async fn process_batch(&self, candidates: Vec<Candidate>, stats: &mut RunStats) {
        stats.fetched += candidates.len();
        let total = candidates.len();

        for (i, candidate) in candidates.into_iter().enumerate() {
            if i > 0 && !self.settings.request_delay.is_zero() {
                sleep(self.settings.request_delay).await;
            }

            let label = format!("{} '{}'", candidate.source, candidate.name);
            match self.process_candidate(candidate) {
                Ok(outcome) => {
                    debug!("{} -> {:?}", label, outcome);
                    stats.record(&outcome);
                }
                Err(e) => {
                    warn!("⚠️ Failed to process {}: {}", label, e);
                    stats.failed += 1;
                }
            }

            if (i + 1) % 50 == 0 {
                info!("… {}/{} candidates processed", i + 1, total);
            }
        }
    }

    pub fn process_candidate(&self, mut candidate: Candidate) -> Result<Outcome, PipelineError> {
        candidate.name = canonicalize_name(&candidate.name);

        if let Some(reason) = self.quality_failure(&candidate) {
            return Ok(Outcome::Rejected(reason));
        }

        let location = match candidate.coordinates {
            Some(point) => self.geo.lookup(point),
            None => NeighborhoodMatch::Unknown { nearest: None },
        };

        let existing = match self.matcher.check(&self.store, &candidate, location.name())? {
            DuplicateCheck::ExternalRef(record) => return Ok(Outcome::SkippedDuplicate(record.id)),
            DuplicateCheck::SimilarName { record, .. } => Some(record),
            DuplicateCheck::Distinct => None,
        };

        let cuisine = self
            .classifier
            .classify(&ClassificationInput::from(&candidate), self.settings.default_cuisine);
        if cuisine.primary == Cuisine::Delete {
            return Ok(Outcome::Rejected(format!("'{}' is not a venue", candidate.name)));
        }

        let price = self
            .classifier
            .infer_price(&candidate.name, candidate.source, candidate.price.as_ref());
        let review_reason = review_reason(&candidate, &location, &cuisine);
        let classification = Classification {
            primary_cuisine: cuisine.primary,
            secondary_cuisine: cuisine.secondary,
            price_tier: price,
            neighborhood: location.name().to_string(),
        };

        match existing {
            Some(record) => self.merge_into(record, &candidate, classification, review_reason),
            None => self.insert(candidate, classification, review_reason),
        }
    }

    fn quality_failure(&self, candidate: &Candidate) -> Option<String> {
        let policy = self.settings.quality_for(candidate.source);

        let reviews = candidate.review_count.unwrap_or(0);
        if reviews < policy.min_review_count {
            return Some(format!("{} reviews, {} required", reviews, policy.min_review_count));
        }
        if policy.require_price && candidate.price.is_none() {
            return Some("no price level".to_string());
        }
        if policy.require_coordinates && candidate.coordinates.is_none() {
            return Some("no coordinates".to_string());
        }
        None
    }

    fn insert(
        &self,
        candidate: Candidate,
        inferred: Classification,
        review_reason: Option<String>,
    ) -> Result<Outcome, PipelineError> {
        let mut external_refs = BTreeMap::new();
        if let Some(external_ref) = &candidate.external_ref {
            external_refs.insert(candidate.source, external_ref.clone());
        }
        let flagged = review_reason.is_some();

        let record = NewRecord {
            details: details_from(candidate),
            inferred,
            external_refs,
            review_reason,
        };

        match self.store.insert(&record) {
            Ok(id) if flagged => Ok(Outcome::FlaggedForReview(id)),
            Ok(id) => Ok(Outcome::Inserted(id)),
            // another writer stored this ref between the check and the insert
            Err(StorageError::DuplicateExternalRef { provider, external_ref }) => {
                match self.store.find_by_external_ref(provider, &external_ref)? {
                    Some(owner) => Ok(Outcome::SkippedDuplicate(owner.id)),
                    None => Err(StorageError::DuplicateExternalRef { provider, external_ref }.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Folds a looser (name) match into the stored record: missing contact
    /// fields are filled, the candidate's ref is attached, and a record still
    /// awaiting review takes the new classification if it resolves it.
    /// Ultra-luxury names end at `$$$$$` whatever the stored tier was.
    fn merge_into(
        &self,
        mut record: BusinessRecord,
        candidate: &Candidate,
        inferred: Classification,
        review_reason: Option<String>,
    ) -> Result<Outcome, PipelineError> {
        fill_missing(&mut record.details, candidate);

        if let Some(external_ref) = &candidate.external_ref {
            record
                .external_refs
                .entry(candidate.source)
                .or_insert_with(|| external_ref.clone());
        }

        if record.needs_review && review_reason.is_none() {
            record.inferred = inferred;
            record.needs_review = false;
            record.review_reason = None;
        } else if record.inferred.price_tier.is_none() {
            record.inferred.price_tier = inferred.price_tier;
        }
        if self.classifier.is_ultra_luxury(record.name()) {
            record.inferred.price_tier = Some(PriceTier::Five);
        }

        self.store.update(&record)?;
        Ok(Outcome::Updated(record.id))
    }
}

fn review_reason(candidate: &Candidate, location: &NeighborhoodMatch, cuisine: &CuisineMatch) -> Option<String> {
    let mut reasons = Vec::new();
    match location {
        NeighborhoodMatch::Known { .. } => {}
        NeighborhoodMatch::Unknown { nearest: Some((name, miles)) } => {
            reasons.push(format!("neighborhood unresolved ({:.1} mi from {})", miles, name))
        }
        NeighborhoodMatch::Unknown { nearest: None } if candidate.coordinates.is_none() => {
            reasons.push("no coordinates".to_string())
        }
        NeighborhoodMatch::Unknown { nearest: None } => reasons.push("neighborhood unresolved".to_string()),
    }
    if cuisine.is_default() {
        reasons.push(format!("cuisine defaulted to {}", cuisine.primary));
    }

    if reasons.is_empty() {
        None
    } else {
        Some(reasons.join("; "))
    }
}

fn details_from(candidate: Candidate) -> VenueDetails {
    VenueDetails {
        name: candidate.name,
        address: candidate.address,
        phone: candidate.phone,
        website: candidate.website,
        coordinates: candidate.coordinates,
        rating: candidate.rating,
        review_count: candidate.review_count,
    }
}

fn fill_missing(details: &mut VenueDetails, candidate: &Candidate) {
    if details.address.is_none() {
        details.address = candidate.address.clone();
    }
    if details.phone.is_none() {
        details.phone = candidate.phone.clone();
    }
    if details.website.is_none() {
        details.website = candidate.website.clone();
    }
    if details.coordinates.is_none() {
        details.coordinates = candidate.coordinates;
    }
    // popularity: keep whichever source has seen more reviews
    if candidate.review_count > details.review_count {
        details.review_count = candidate.review_count;
        details.rating = candidate.rating.or(details.rating);
    }
}

/// Display helper for price tiers that may be missing.
pub fn price_label(price: Option<PriceTier>) -> &'static str {
    price.map(|p| p.as_str()).unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, PriceSignal};
    use crate::storage::SqliteStorage;

    const LITTLE_HAVANA: (f64, f64) = (25.7668, -80.2198);

    fn pipeline() -> Pipeline<SqliteStorage> {
        Pipeline::new(
            SqliteStorage::in_memory().unwrap(),
            GeoIndex::default(),
            TextClassifier::standard(),
            DuplicateMatcher::default(),
            PipelineSettings::default(),
        )
    }

    fn candidate_at(source: Source, name: &str, (lat, lng): (f64, f64)) -> Candidate {
        let mut candidate = Candidate::new(source, name);
        candidate.coordinates = Some(Coordinates::new(lat, lng));
        candidate
    }

    #[test]
    fn inserts_a_new_venue() {
        let p = pipeline();
        let outcome = p
            .process_candidate(candidate_at(Source::Manual, "Dr. Smith's Tacos", LITTLE_HAVANA))
            .unwrap();
        let Outcome::Inserted(id) = outcome else {
            panic!("expected insert, got {:?}", outcome);
        };

        let record = p.store().get(id).unwrap().unwrap();
        assert_eq!(record.name(), "Dr. Smith's Tacos");
        assert_eq!(record.primary_cuisine(), Cuisine::Mexican);
        assert_eq!(record.neighborhood(), "Little Havana");
        assert!(!record.needs_review);
    }

    #[test]
    fn unresolved_fields_are_flagged_but_written() {
        let p = pipeline();
        let outcome = p
            .process_candidate(candidate_at(Source::Yelp, "Zzyzx", (24.5551, -81.7800)))
            .unwrap();
        let Outcome::FlaggedForReview(id) = outcome else {
            panic!("expected flag, got {:?}", outcome);
        };

        let record = p.store().get(id).unwrap().unwrap();
        assert!(record.needs_review);
        assert_eq!(record.neighborhood(), "Unknown");
        assert_eq!(record.primary_cuisine(), Cuisine::American);
        let reason = record.review_reason.unwrap();
        assert!(reason.contains("neighborhood unresolved"), "{}", reason);
        assert!(reason.contains("cuisine defaulted"), "{}", reason);
    }

    #[test]
    fn missing_coordinates_are_flagged() {
        let p = pipeline();
        let outcome = p.process_candidate(Candidate::new(Source::Yelp, "Joe's Pizza")).unwrap();
        let Outcome::FlaggedForReview(id) = outcome else {
            panic!("expected flag, got {:?}", outcome);
        };
        let record = p.store().get(id).unwrap().unwrap();
        assert_eq!(record.review_reason.as_deref(), Some("no coordinates"));
        assert_eq!(record.primary_cuisine(), Cuisine::Pizza);
    }

    #[test]
    fn non_venues_are_rejected() {
        let p = pipeline();
        let outcome = p
            .process_candidate(candidate_at(Source::GooglePlaces, "CVS Pharmacy #4410", LITTLE_HAVANA))
            .unwrap();
        assert!(matches!(outcome, Outcome::Rejected(_)));
        assert_eq!(p.store().count().unwrap(), 0);
    }

    #[test]
    fn quality_policy_rejects_thin_candidates() {
        let mut settings = PipelineSettings::default();
        settings.quality.insert(
            Source::Yelp,
            QualityPolicy {
                min_review_count: 10,
                require_price: true,
                require_coordinates: false,
            },
        );
        assert_eq!(settings.quality_for(Source::Yelp).min_review_count, 10);
        assert_eq!(settings.quality_for(Source::Manual), QualityPolicy::default());
        let p = Pipeline::new(
            SqliteStorage::in_memory().unwrap(),
            GeoIndex::default(),
            TextClassifier::standard(),
            DuplicateMatcher::default(),
            settings,
        );

        let mut thin = candidate_at(Source::Yelp, "Versailles", LITTLE_HAVANA);
        thin.review_count = Some(3);
        assert!(matches!(p.process_candidate(thin).unwrap(), Outcome::Rejected(_)));

        let mut no_price = candidate_at(Source::Yelp, "Versailles", LITTLE_HAVANA);
        no_price.review_count = Some(300);
        assert_eq!(
            p.process_candidate(no_price).unwrap(),
            Outcome::Rejected("no price level".to_string())
        );

        // other sources are unaffected
        let manual = candidate_at(Source::Manual, "Versailles", LITTLE_HAVANA);
        assert!(matches!(p.process_candidate(manual).unwrap(), Outcome::Inserted(_)));
    }

    #[test]
    fn name_match_updates_the_existing_record() {
        let p = pipeline();
        let mut first = candidate_at(Source::Yelp, "Versailles", LITTLE_HAVANA);
        first.external_ref = Some("versailles-123".into());
        let Outcome::Inserted(id) = p.process_candidate(first).unwrap() else {
            panic!("first import should insert");
        };

        let mut second = candidate_at(Source::GooglePlaces, "VERSAILLES RESTAURANT", LITTLE_HAVANA);
        second.external_ref = Some("ChIJ-versailles".into());
        second.phone = Some("(305) 444-0240".into());
        second.price = Some(PriceSignal::Level(2));
        assert_eq!(p.process_candidate(second).unwrap(), Outcome::Updated(id));

        let record = p.store().get(id).unwrap().unwrap();
        assert_eq!(record.name(), "Versailles");
        assert_eq!(record.details.phone.as_deref(), Some("(305) 444-0240"));
        assert_eq!(record.external_refs.len(), 2);
        assert_eq!(record.price_tier(), Some(PriceTier::Two));
        assert_eq!(p.store().count().unwrap(), 1);
    }

    #[test]
    fn merge_lifts_ultra_luxury_names_to_five() {
        let p = pipeline();
        let id = p
            .store()
            .insert(&NewRecord {
                details: VenueDetails {
                    name: "Carbone".into(),
                    ..VenueDetails::default()
                },
                inferred: Classification {
                    primary_cuisine: Cuisine::Italian,
                    secondary_cuisine: None,
                    price_tier: Some(PriceTier::Four),
                    neighborhood: "Little Havana".into(),
                },
                external_refs: BTreeMap::new(),
                review_reason: None,
            })
            .unwrap();

        let mut again = candidate_at(Source::Yelp, "CARBONE", LITTLE_HAVANA);
        again.price = Some(PriceSignal::Symbols("$$$$".into()));
        assert_eq!(p.process_candidate(again).unwrap(), Outcome::Updated(id));

        let record = p.store().get(id).unwrap().unwrap();
        assert_eq!(record.inferred.price_tier, Some(PriceTier::Five));
        assert_eq!(record.price_tier(), Some(PriceTier::Five));
    }

    #[test]
    fn update_resolves_a_flagged_record() {
        let p = pipeline();
        // no description or categories: cuisine defaults and the record is flagged
        let Outcome::FlaggedForReview(id) = p
            .process_candidate(candidate_at(Source::Yelp, "Harry's Place", LITTLE_HAVANA))
            .unwrap()
        else {
            panic!("expected a flagged insert");
        };

        let mut better = candidate_at(Source::GooglePlaces, "Harrys Place", LITTLE_HAVANA);
        better.categories = vec!["cuban_restaurant".into()];
        assert_eq!(p.process_candidate(better).unwrap(), Outcome::Updated(id));

        let record = p.store().get(id).unwrap().unwrap();
        assert!(!record.needs_review);
        assert_eq!(record.primary_cuisine(), Cuisine::Cuban);
    }

    #[tokio::test]
    async fn batch_counts_every_outcome() {
        let p = pipeline();
        let mut stats = RunStats::default();
        let mut dup = candidate_at(Source::Yelp, "Kyu", (25.8005, -80.1992));
        dup.external_ref = Some("kyu".into());

        p.process_batch(
            vec![
                dup.clone(),
                dup,
                candidate_at(Source::Yelp, "Walgreens", LITTLE_HAVANA),
                candidate_at(Source::Yelp, "Zzyzx", LITTLE_HAVANA),
            ],
            &mut stats,
        )
        .await;

        assert_eq!(stats.fetched, 4);
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.skipped_duplicates, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.flagged, 1);
        assert_eq!(stats.processed(), 4);
    }

    #[test]
    fn stats_render_as_a_summary_line() {
        let mut stats = RunStats::default();
        stats.record(&Outcome::Inserted(RecordId(1)));
        stats.record(&Outcome::Rejected("x".into()));
        assert_eq!(stats.inserted, 1);
        assert!(stats.to_string().contains("inserted 1"));
        assert_eq!(price_label(None), "?");
        assert_eq!(price_label(Some(PriceTier::Three)), "$$$");
    }
}
