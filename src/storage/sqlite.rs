use crate::model::{
    BusinessRecord, Classification, ClassificationOverride, Coordinates, NewRecord, RecordId,
    Source, StorageError, VenueDetails,
};
use crate::storage::{RecordFilter, RecordStore};
use chrono::{DateTime, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params, params_from_iter};
use std::collections::BTreeMap;
use std::str::FromStr;

const RECORD_COLUMNS: &str = "id, name, address, phone, website, latitude, longitude, rating, review_count,
    inferred_primary, inferred_secondary, inferred_price, inferred_neighborhood,
    override_primary, override_secondary, override_price, override_neighborhood,
    needs_review, review_reason, last_updated";

const EFFECTIVE_NEIGHBORHOOD: &str = "COALESCE(override_neighborhood, inferred_neighborhood)";

pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database and runs migrations.
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS businesses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                address TEXT,
                phone TEXT,
                website TEXT,
                latitude REAL,
                longitude REAL,
                inferred_primary TEXT NOT NULL,
                inferred_secondary TEXT,
                inferred_price TEXT,
                inferred_neighborhood TEXT NOT NULL,
                override_primary TEXT,
                override_secondary TEXT,
                override_price TEXT,
                override_neighborhood TEXT,
                last_updated TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS external_refs (
                source TEXT NOT NULL,
                external_id TEXT NOT NULL,
                business_id INTEGER NOT NULL REFERENCES businesses(id) ON DELETE CASCADE,
                PRIMARY KEY (source, external_id),
                UNIQUE (business_id, source)
            );

            CREATE INDEX IF NOT EXISTS idx_businesses_neighborhood
                ON businesses (inferred_neighborhood);
            ",
        )?;

        // Columns added after the first schema; older databases get them here
        Self::migrate_add_column_if_missing(&conn, "businesses", "rating", "REAL")?;
        Self::migrate_add_column_if_missing(&conn, "businesses", "review_count", "INTEGER")?;
        Self::migrate_add_column_if_missing(&conn, "businesses", "needs_review", "INTEGER NOT NULL DEFAULT 0")?;
        Self::migrate_add_column_if_missing(&conn, "businesses", "review_reason", "TEXT")?;

        Ok(Self { conn })
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::new(":memory:")
    }

    fn migrate_add_column_if_missing(
        conn: &Connection,
        table: &str,
        column: &str,
        column_def: &str,
    ) -> Result<(), StorageError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let existing_columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<_, _>>()?;

        if !existing_columns.iter().any(|c| c == column) {
            let alter_sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def);
            conn.execute(&alter_sql, [])?;
        }

        Ok(())
    }

    pub fn count(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM businesses", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn select_records(&self, sql: &str, values: &[Value]) -> Result<Vec<BusinessRecord>, StorageError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::map_record)?;

        let mut records = Vec::new();
        for row in rows {
            let mut record = row?;
            record.external_refs = self.external_refs_for(record.id)?;
            records.push(record);
        }
        Ok(records)
    }

    fn external_refs_for(&self, id: RecordId) -> Result<BTreeMap<Source, String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT source, external_id FROM external_refs WHERE business_id = ?1")?;
        let rows = stmt.query_map(params![id.0], |row| {
            let source: Source = parse_column(row, 0)?;
            let external_id: String = row.get(1)?;
            Ok((source, external_id))
        })?;

        let mut refs = BTreeMap::new();
        for row in rows {
            let (source, external_id) = row?;
            refs.insert(source, external_id);
        }
        Ok(refs)
    }

    /// Upserts one ref; a ref owned by another record is reported as a duplicate.
    fn upsert_external_ref(
        conn: &Connection,
        id: RecordId,
        source: Source,
        external_ref: &str,
    ) -> Result<(), StorageError> {
        let owner: Option<i64> = conn
            .query_row(
                "SELECT business_id FROM external_refs WHERE source = ?1 AND external_id = ?2",
                params![source.as_str(), external_ref],
                |row| row.get(0),
            )
            .optional()?;
        if owner == Some(id.0) {
            return Ok(());
        }

        conn.execute(
            "INSERT INTO external_refs (source, external_id, business_id) VALUES (?1, ?2, ?3)
             ON CONFLICT (business_id, source) DO UPDATE SET external_id = excluded.external_id",
            params![source.as_str(), external_ref, id.0],
        )
        .map_err(|e| duplicate_or(e, source, external_ref))?;
        Ok(())
    }

    fn map_record(row: &Row) -> Result<BusinessRecord, rusqlite::Error> {
        let latitude: Option<f64> = row.get(5)?;
        let longitude: Option<f64> = row.get(6)?;
        let last_updated: String = row.get(19)?;
        let last_updated: DateTime<Utc> = last_updated
            .parse()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(19, Type::Text, Box::new(e)))?;

        Ok(BusinessRecord {
            id: RecordId(row.get(0)?),
            details: VenueDetails {
                name: row.get(1)?,
                address: row.get(2)?,
                phone: row.get(3)?,
                website: row.get(4)?,
                coordinates: latitude.zip(longitude).map(|(lat, lng)| Coordinates::new(lat, lng)),
                rating: row.get(7)?,
                review_count: row.get(8)?,
            },
            inferred: Classification {
                primary_cuisine: parse_column(row, 9)?,
                secondary_cuisine: parse_optional_column(row, 10)?,
                price_tier: parse_optional_column(row, 11)?,
                neighborhood: row.get(12)?,
            },
            overrides: ClassificationOverride {
                primary_cuisine: parse_optional_column(row, 13)?,
                secondary_cuisine: parse_optional_column(row, 14)?,
                price_tier: parse_optional_column(row, 15)?,
                neighborhood: row.get(16)?,
            },
            external_refs: BTreeMap::new(),
            needs_review: row.get(17)?,
            review_reason: row.get(18)?,
            last_updated,
        })
    }
}

impl RecordStore for SqliteStorage {
    fn insert(&self, record: &NewRecord) -> Result<RecordId, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let details = &record.details;
        let inferred = &record.inferred;

        tx.execute(
            "INSERT INTO businesses (
                name, address, phone, website, latitude, longitude, rating, review_count,
                inferred_primary, inferred_secondary, inferred_price, inferred_neighborhood,
                needs_review, review_reason, last_updated
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                &details.name,
                &details.address,
                &details.phone,
                &details.website,
                details.coordinates.map(|c| c.latitude),
                details.coordinates.map(|c| c.longitude),
                details.rating,
                details.review_count,
                inferred.primary_cuisine.as_str(),
                inferred.secondary_cuisine.map(|c| c.as_str()),
                inferred.price_tier.map(|p| p.as_str()),
                &inferred.neighborhood,
                record.review_reason.is_some(),
                &record.review_reason,
                Utc::now().to_rfc3339(),
            ],
        )?;
        let id = RecordId(tx.last_insert_rowid());

        for (source, external_ref) in &record.external_refs {
            Self::upsert_external_ref(&tx, id, *source, external_ref)?;
        }

        tx.commit()?;
        Ok(id)
    }

    fn update(&self, record: &BusinessRecord) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let details = &record.details;
        let inferred = &record.inferred;

        let changed = tx.execute(
            "UPDATE businesses SET
                name = ?2, address = ?3, phone = ?4, website = ?5, latitude = ?6, longitude = ?7,
                rating = ?8, review_count = ?9,
                inferred_primary = ?10, inferred_secondary = ?11, inferred_price = ?12,
                inferred_neighborhood = ?13, needs_review = ?14, review_reason = ?15,
                last_updated = ?16
             WHERE id = ?1",
            params![
                record.id.0,
                &details.name,
                &details.address,
                &details.phone,
                &details.website,
                details.coordinates.map(|c| c.latitude),
                details.coordinates.map(|c| c.longitude),
                details.rating,
                details.review_count,
                inferred.primary_cuisine.as_str(),
                inferred.secondary_cuisine.map(|c| c.as_str()),
                inferred.price_tier.map(|p| p.as_str()),
                &inferred.neighborhood,
                record.needs_review,
                &record.review_reason,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(record.id));
        }

        for (source, external_ref) in &record.external_refs {
            Self::upsert_external_ref(&tx, record.id, *source, external_ref)?;
        }

        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: RecordId) -> Result<Option<BusinessRecord>, StorageError> {
        let sql = format!("SELECT {} FROM businesses WHERE id = ?1", RECORD_COLUMNS);
        let record = self
            .conn
            .query_row(&sql, params![id.0], Self::map_record)
            .optional()?;

        match record {
            Some(mut record) => {
                record.external_refs = self.external_refs_for(record.id)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn find_by_external_ref(
        &self,
        source: Source,
        external_ref: &str,
    ) -> Result<Option<BusinessRecord>, StorageError> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT business_id FROM external_refs WHERE source = ?1 AND external_id = ?2",
                params![source.as_str(), external_ref],
                |row| row.get(0),
            )
            .optional()?;

        match id {
            Some(id) => self.get(RecordId(id)),
            None => Ok(None),
        }
    }

    fn records_in_neighborhood(&self, neighborhood: &str) -> Result<Vec<BusinessRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM businesses WHERE {} = ?1 ORDER BY id",
            RECORD_COLUMNS, EFFECTIVE_NEIGHBORHOOD
        );
        self.select_records(&sql, &[Value::Text(neighborhood.to_string())])
    }

    fn search(&self, filter: &RecordFilter) -> Result<Vec<BusinessRecord>, StorageError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(cuisine) = filter.cuisine {
            clauses.push(
                "(COALESCE(override_primary, inferred_primary) = ? OR COALESCE(override_secondary, inferred_secondary) = ?)"
                    .to_string(),
            );
            values.push(Value::Text(cuisine.as_str().to_string()));
            values.push(Value::Text(cuisine.as_str().to_string()));
        }

        if !filter.neighborhoods.is_empty() {
            let placeholders = filter.neighborhoods.iter().map(|_| "?").collect::<Vec<_>>().join(",");
            clauses.push(format!("{} IN ({})", EFFECTIVE_NEIGHBORHOOD, placeholders));
            values.extend(filter.neighborhoods.iter().cloned().map(Value::Text));
        }

        if let Some(max_price) = filter.max_price {
            clauses.push(
                "COALESCE(override_price, inferred_price) IS NOT NULL AND LENGTH(COALESCE(override_price, inferred_price)) <= ?"
                    .to_string(),
            );
            values.push(Value::Integer(i64::from(max_price.level())));
        }

        if let Some(term) = filter.name_contains.as_deref() {
            clauses.push("LOWER(name) LIKE ? ESCAPE '\\'".to_string());
            values.push(Value::Text(format!("%{}%", escape_like(&term.to_lowercase()))));
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let limit = filter.limit.map(|l| l as i64).unwrap_or(-1);
        values.push(Value::Integer(limit));
        values.push(Value::Integer(filter.offset as i64));

        let sql = format!(
            "SELECT {} FROM businesses {} ORDER BY name COLLATE NOCASE, id LIMIT ? OFFSET ?",
            RECORD_COLUMNS, where_clause
        );
        self.select_records(&sql, &values)
    }

    fn set_override(&self, id: RecordId, overrides: &ClassificationOverride) -> Result<(), StorageError> {
        let changed = self.conn.execute(
            "UPDATE businesses SET
                override_primary = ?2, override_secondary = ?3, override_price = ?4,
                override_neighborhood = ?5, needs_review = 0, review_reason = NULL, last_updated = ?6
             WHERE id = ?1",
            params![
                id.0,
                overrides.primary_cuisine.map(|c| c.as_str()),
                overrides.secondary_cuisine.map(|c| c.as_str()),
                overrides.price_tier.map(|p| p.as_str()),
                &overrides.neighborhood,
                Utc::now().to_rfc3339(),
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: RecordId) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM external_refs WHERE business_id = ?1", params![id.0])?;
        let changed = tx.execute("DELETE FROM businesses WHERE id = ?1", params![id.0])?;
        if changed == 0 {
            return Err(StorageError::NotFound(id));
        }
        tx.commit()?;
        Ok(())
    }

    fn records_needing_review(&self) -> Result<Vec<BusinessRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM businesses WHERE needs_review = 1 ORDER BY id",
            RECORD_COLUMNS
        );
        self.select_records(&sql, &[])
    }
}

fn parse_column<T: FromStr<Err = String>>(row: &Row, idx: usize) -> Result<T, rusqlite::Error> {
    let text: String = row.get(idx)?;
    text.parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

fn parse_optional_column<T: FromStr<Err = String>>(
    row: &Row,
    idx: usize,
) -> Result<Option<T>, rusqlite::Error> {
    let text: Option<String> = row.get(idx)?;
    text.map(|text| {
        text.parse()
            .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
    })
    .transpose()
}

fn duplicate_or(e: rusqlite::Error, source: Source, external_ref: &str) -> StorageError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            StorageError::DuplicateExternalRef {
                provider: source,
                external_ref: external_ref.to_string(),
            }
        }
        _ => StorageError::DatabaseError(e),
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cuisine, PriceTier};

    fn new_record(name: &str, neighborhood: &str, cuisine: Cuisine) -> NewRecord {
        NewRecord {
            details: VenueDetails {
                name: name.to_string(),
                coordinates: Some(Coordinates::new(25.7668, -80.2198)),
                review_count: Some(120),
                ..VenueDetails::default()
            },
            inferred: Classification {
                primary_cuisine: cuisine,
                secondary_cuisine: None,
                price_tier: Some(PriceTier::Two),
                neighborhood: neighborhood.to_string(),
            },
            external_refs: BTreeMap::new(),
            review_reason: None,
        }
    }

    fn with_ref(mut record: NewRecord, source: Source, id: &str) -> NewRecord {
        record.external_refs.insert(source, id.to_string());
        record
    }

    #[test]
    fn insert_then_get_round_trips_fields() {
        let store = SqliteStorage::in_memory().unwrap();
        let draft = with_ref(
            new_record("Versailles", "Little Havana", Cuisine::Cuban),
            Source::Yelp,
            "versailles-123",
        );
        let id = store.insert(&draft).unwrap();

        let record = store.get(id).unwrap().expect("record exists");
        assert_eq!(record.details, draft.details);
        assert_eq!(record.inferred, draft.inferred);
        assert_eq!(record.external_refs.get(&Source::Yelp).map(String::as_str), Some("versailles-123"));
        assert!(record.overrides.is_empty());
        assert!(!record.needs_review);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn external_refs_are_unique_per_source() {
        let store = SqliteStorage::in_memory().unwrap();
        store
            .insert(&with_ref(new_record("Versailles", "Little Havana", Cuisine::Cuban), Source::Yelp, "v-1"))
            .unwrap();

        let err = store
            .insert(&with_ref(new_record("Versailles II", "Little Havana", Cuisine::Cuban), Source::Yelp, "v-1"))
            .unwrap_err();
        assert!(matches!(err, StorageError::DuplicateExternalRef { provider: Source::Yelp, .. }));
        // the failed insert rolled back entirely
        assert_eq!(store.count().unwrap(), 1);

        // the same id from another provider is a different ref
        store
            .insert(&with_ref(new_record("Other", "Brickell", Cuisine::Cuban), Source::GooglePlaces, "v-1"))
            .unwrap();
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn find_by_external_ref() {
        let store = SqliteStorage::in_memory().unwrap();
        let id = store
            .insert(&with_ref(new_record("Kyu", "Wynwood", Cuisine::AsianFusion), Source::GooglePlaces, "ChIJ-kyu"))
            .unwrap();

        let found = store.find_by_external_ref(Source::GooglePlaces, "ChIJ-kyu").unwrap();
        assert_eq!(found.map(|r| r.id), Some(id));
        assert!(store.find_by_external_ref(Source::Yelp, "ChIJ-kyu").unwrap().is_none());
    }

    #[test]
    fn overrides_win_in_neighborhood_queries() {
        let store = SqliteStorage::in_memory().unwrap();
        let id = store.insert(&new_record("Joe's Stone Crab", "Unknown", Cuisine::American)).unwrap();
        assert_eq!(store.records_in_neighborhood("Unknown").unwrap().len(), 1);

        let overrides = ClassificationOverride {
            primary_cuisine: Some(Cuisine::Seafood),
            neighborhood: Some("South Beach".into()),
            ..ClassificationOverride::default()
        };
        store.set_override(id, &overrides).unwrap();

        assert!(store.records_in_neighborhood("Unknown").unwrap().is_empty());
        let found = store.records_in_neighborhood("South Beach").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].primary_cuisine(), Cuisine::Seafood);
        assert_eq!(found[0].inferred.primary_cuisine, Cuisine::American);
    }

    #[test]
    fn update_keeps_overrides() {
        let store = SqliteStorage::in_memory().unwrap();
        let id = store.insert(&new_record("Zuma", "Downtown", Cuisine::Japanese)).unwrap();
        store
            .set_override(id, &ClassificationOverride { price_tier: Some(PriceTier::Five), ..Default::default() })
            .unwrap();

        let mut record = store.get(id).unwrap().unwrap();
        record.details.phone = Some("(305) 577-0277".into());
        record.inferred.price_tier = Some(PriceTier::Four);
        store.update(&record).unwrap();

        let reloaded = store.get(id).unwrap().unwrap();
        assert_eq!(reloaded.details.phone.as_deref(), Some("(305) 577-0277"));
        assert_eq!(reloaded.price_tier(), Some(PriceTier::Five));
        assert_eq!(reloaded.inferred.price_tier, Some(PriceTier::Four));
        assert!(reloaded.last_updated >= record.last_updated);
    }

    #[test]
    fn update_and_delete_report_missing_records() {
        let store = SqliteStorage::in_memory().unwrap();
        let id = store.insert(&new_record("Zuma", "Downtown", Cuisine::Japanese)).unwrap();
        let mut record = store.get(id).unwrap().unwrap();
        store.delete(id).unwrap();

        assert!(store.get(id).unwrap().is_none());
        assert!(matches!(store.delete(id), Err(StorageError::NotFound(_))));
        record.details.name = "Zuma Miami".into();
        assert!(matches!(store.update(&record), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn search_filters_and_paginates() {
        let store = SqliteStorage::in_memory().unwrap();
        store.insert(&new_record("Versailles", "Little Havana", Cuisine::Cuban)).unwrap();
        store.insert(&new_record("La Carreta", "Little Havana", Cuisine::Cuban)).unwrap();
        store.insert(&new_record("Puerto Sagua", "South Beach", Cuisine::Cuban)).unwrap();
        let mut pricey = new_record("Prime 112", "South Beach", Cuisine::Steakhouse);
        pricey.inferred.price_tier = Some(PriceTier::Five);
        pricey.inferred.secondary_cuisine = Some(Cuisine::Seafood);
        store.insert(&pricey).unwrap();

        let cuban = store.search(&RecordFilter::cuisine(Cuisine::Cuban)).unwrap();
        let names: Vec<&str> = cuban.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["La Carreta", "Puerto Sagua", "Versailles"]);

        let seafood = store.search(&RecordFilter::cuisine(Cuisine::Seafood)).unwrap();
        assert_eq!(seafood.len(), 1);

        let filter = RecordFilter {
            neighborhoods: vec!["South Beach".into()],
            max_price: Some(PriceTier::Two),
            ..RecordFilter::default()
        };
        let cheap_beach = store.search(&filter).unwrap();
        assert_eq!(cheap_beach.len(), 1);
        assert_eq!(cheap_beach[0].name(), "Puerto Sagua");

        let page = RecordFilter {
            limit: Some(2),
            offset: 1,
            ..RecordFilter::default()
        };
        let names: Vec<String> = store.search(&page).unwrap().iter().map(|r| r.name().to_string()).collect();
        assert_eq!(names, ["Prime 112", "Puerto Sagua"]);

        let by_name = RecordFilter {
            name_contains: Some("CARRE".into()),
            ..RecordFilter::default()
        };
        assert_eq!(store.search(&by_name).unwrap().len(), 1);

        let wildcard = RecordFilter {
            name_contains: Some("%".into()),
            ..RecordFilter::default()
        };
        assert!(store.search(&wildcard).unwrap().is_empty());
    }

    #[test]
    fn review_queue_and_override_clearing() {
        let store = SqliteStorage::in_memory().unwrap();
        let mut flagged = new_record("Mystery Spot", "Unknown", Cuisine::American);
        flagged.review_reason = Some("neighborhood unresolved".into());
        let id = store.insert(&flagged).unwrap();
        store.insert(&new_record("Versailles", "Little Havana", Cuisine::Cuban)).unwrap();

        let queue = store.records_needing_review().unwrap();
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].review_reason.as_deref(), Some("neighborhood unresolved"));

        store
            .set_override(id, &ClassificationOverride { neighborhood: Some("Wynwood".into()), ..Default::default() })
            .unwrap();
        assert!(store.records_needing_review().unwrap().is_empty());
    }

    #[test]
    fn migrations_are_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("venues.db");
        let path = path.to_str().unwrap();
        {
            let store = SqliteStorage::new(path).unwrap();
            store.insert(&new_record("Kyu", "Wynwood", Cuisine::AsianFusion)).unwrap();
        }
        let reopened = SqliteStorage::new(path).unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
