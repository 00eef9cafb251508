// Restaurant and free-text search over stored records
use crate::geo::GeoIndex;
use crate::model::{BusinessRecord, Cuisine, PriceTier, RecordId, StorageError};
use crate::storage::{RecordFilter, RecordStore};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Everyday words mapped onto the cuisine vocabulary.
const SYNONYM_TABLE: &[(&str, &[Cuisine])] = &[
    ("sushi", &[Cuisine::Japanese]),
    ("ramen", &[Cuisine::Japanese]),
    ("omakase", &[Cuisine::Japanese]),
    ("asian", &[Cuisine::AsianFusion, Cuisine::Chinese, Cuisine::Japanese, Cuisine::Thai]),
    ("noodles", &[Cuisine::Chinese, Cuisine::Vietnamese, Cuisine::Japanese]),
    ("dim sum", &[Cuisine::Chinese]),
    ("pho", &[Cuisine::Vietnamese]),
    ("curry", &[Cuisine::Indian, Cuisine::Thai]),
    ("tacos", &[Cuisine::Mexican]),
    ("taco", &[Cuisine::Mexican]),
    ("burrito", &[Cuisine::Mexican]),
    ("cafecito", &[Cuisine::Cuban, Cuisine::Cafe]),
    ("croquetas", &[Cuisine::Cuban]),
    ("latin", &[Cuisine::Latin, Cuisine::Cuban, Cuisine::Peruvian, Cuisine::Venezuelan, Cuisine::Colombian]),
    ("ceviche", &[Cuisine::Peruvian, Cuisine::Seafood]),
    ("arepas", &[Cuisine::Venezuelan, Cuisine::Colombian]),
    ("empanadas", &[Cuisine::Argentinian]),
    ("tapas", &[Cuisine::Spanish]),
    ("pasta", &[Cuisine::Italian]),
    ("pizza", &[Cuisine::Pizza]),
    ("steak", &[Cuisine::Steakhouse]),
    ("fish", &[Cuisine::Seafood]),
    ("oysters", &[Cuisine::Seafood]),
    ("stone crab", &[Cuisine::Seafood]),
    ("burger", &[Cuisine::Burgers]),
    ("barbecue", &[Cuisine::Bbq]),
    ("sandwich", &[Cuisine::Deli]),
    ("coffee", &[Cuisine::Cafe]),
    ("pastries", &[Cuisine::Bakery, Cuisine::Dessert]),
    ("ice cream", &[Cuisine::Dessert]),
    ("brunch", &[Cuisine::Breakfast]),
    ("breakfast", &[Cuisine::Breakfast]),
    ("vegetarian", &[Cuisine::Vegan]),
    ("plant based", &[Cuisine::Vegan]),
    ("drinks", &[Cuisine::Bar]),
    ("cocktails", &[Cuisine::Bar]),
    ("nightlife", &[Cuisine::Bar]),
    ("wine", &[Cuisine::Bar]),
];

static SYNONYMS: Lazy<BTreeMap<&'static str, &'static [Cuisine]>> =
    Lazy::new(|| SYNONYM_TABLE.iter().copied().collect());

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantQuery {
    pub cuisine: Option<Cuisine>,
    pub neighborhood: Option<String>,
    /// Highest acceptable price tier.
    pub budget: Option<PriceTier>,
    pub limit: Option<usize>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub records: Vec<BusinessRecord>,
    /// Neighborhoods searched instead when the requested one had no rows.
    pub expanded_to: Vec<String>,
}

/// Cuisine / neighborhood / budget search. When a neighborhood query has no
/// rows, the adjacent neighborhoods are searched instead.
pub fn find_restaurants<S: RecordStore + ?Sized>(
    store: &S,
    geo: &GeoIndex,
    query: &RestaurantQuery,
) -> Result<SearchResults, StorageError> {
    let neighborhood = query
        .neighborhood
        .as_deref()
        .map(|name| geo.canonical_name(name).unwrap_or(name).to_string());

    let mut filter = RecordFilter {
        cuisine: query.cuisine,
        neighborhoods: neighborhood.iter().cloned().collect(),
        max_price: query.budget,
        name_contains: None,
        limit: query.limit,
        offset: query.offset,
    };
    let records = store.search(&filter)?;

    let Some(neighborhood) = neighborhood else {
        return Ok(SearchResults {
            records,
            expanded_to: Vec::new(),
        });
    };
    let adjacent = geo.adjacent(&neighborhood);
    if !records.is_empty() || adjacent.is_empty() || query.offset > 0 {
        return Ok(SearchResults {
            records,
            expanded_to: Vec::new(),
        });
    }

    debug!("no rows in {}, expanding to {:?}", neighborhood, adjacent);
    filter.neighborhoods = adjacent.to_vec();
    Ok(SearchResults {
        records: store.search(&filter)?,
        expanded_to: adjacent.to_vec(),
    })
}

/// Cuisines a free-text query stands for: an exact vocabulary name, or any
/// synonym phrase contained in the query.
pub fn expand_query(query: &str) -> Vec<Cuisine> {
    let normalized = query
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let padded = format!(" {} ", normalized);

    let mut cuisines = Vec::new();
    if let Ok(cuisine) = query.parse::<Cuisine>() {
        cuisines.push(cuisine);
    }
    for (phrase, mapped) in SYNONYMS.iter() {
        if padded.contains(&format!(" {} ", phrase)) {
            cuisines.extend(mapped.iter().copied());
        }
    }
    for word in normalized.split(' ') {
        if let Ok(cuisine) = word.parse::<Cuisine>() {
            cuisines.push(cuisine);
        }
    }

    let mut seen = HashSet::new();
    cuisines.retain(|c| *c != Cuisine::Delete && seen.insert(*c));
    cuisines
}

/// Name matches first, then records tagged with any cuisine the query expands to.
pub fn text_search<S: RecordStore + ?Sized>(
    store: &S,
    query: &str,
    limit: usize,
) -> Result<Vec<BusinessRecord>, StorageError> {
    let term = query.trim();
    if term.is_empty() || limit == 0 {
        return Ok(Vec::new());
    }

    let mut seen: HashSet<RecordId> = HashSet::new();
    let mut results = Vec::new();

    let by_name = RecordFilter {
        name_contains: Some(term.to_string()),
        limit: Some(limit),
        ..RecordFilter::default()
    };
    for record in store.search(&by_name)? {
        if seen.insert(record.id) {
            results.push(record);
        }
    }

    for cuisine in expand_query(term) {
        if results.len() >= limit {
            break;
        }
        let by_cuisine = RecordFilter {
            limit: Some(limit),
            ..RecordFilter::cuisine(cuisine)
        };
        for record in store.search(&by_cuisine)? {
            if results.len() >= limit {
                break;
            }
            if seen.insert(record.id) {
                results.push(record);
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, NewRecord, VenueDetails};
    use crate::storage::SqliteStorage;

    fn seed(store: &SqliteStorage, name: &str, neighborhood: &str, cuisine: Cuisine, price: PriceTier) {
        store
            .insert(&NewRecord {
                details: VenueDetails {
                    name: name.to_string(),
                    ..VenueDetails::default()
                },
                inferred: Classification {
                    primary_cuisine: cuisine,
                    secondary_cuisine: None,
                    price_tier: Some(price),
                    neighborhood: neighborhood.to_string(),
                },
                external_refs: Default::default(),
                review_reason: None,
            })
            .unwrap();
    }

    fn seeded() -> SqliteStorage {
        let store = SqliteStorage::in_memory().unwrap();
        seed(&store, "Versailles", "Little Havana", Cuisine::Cuban, PriceTier::Two);
        seed(&store, "La Carreta", "Little Havana", Cuisine::Cuban, PriceTier::One);
        seed(&store, "Zuma", "Downtown Miami", Cuisine::Japanese, PriceTier::Five);
        seed(&store, "Kyu", "Wynwood", Cuisine::AsianFusion, PriceTier::Three);
        seed(&store, "Joe's Pizza", "Wynwood", Cuisine::Pizza, PriceTier::One);
        store
    }

    #[test]
    fn filters_by_cuisine_neighborhood_and_budget() {
        let store = seeded();
        let geo = GeoIndex::default();

        let query = RestaurantQuery {
            cuisine: Some(Cuisine::Cuban),
            neighborhood: Some("little havana".into()),
            budget: Some(PriceTier::One),
            ..RestaurantQuery::default()
        };
        let results = find_restaurants(&store, &geo, &query).unwrap();
        assert_eq!(results.records.len(), 1);
        assert_eq!(results.records[0].name(), "La Carreta");
        assert!(results.expanded_to.is_empty());
    }

    #[test]
    fn empty_neighborhood_expands_to_adjacent() {
        let store = seeded();
        let geo = GeoIndex::default();
        assert!(!geo.adjacent("Midtown").is_empty());

        let query = RestaurantQuery {
            neighborhood: Some("Midtown".into()),
            ..RestaurantQuery::default()
        };
        let results = find_restaurants(&store, &geo, &query).unwrap();
        assert_eq!(results.expanded_to, geo.adjacent("Midtown"));
        let names: Vec<&str> = results.records.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["Joe's Pizza", "Kyu"]);
    }

    #[test]
    fn unknown_neighborhood_returns_nothing_without_expanding() {
        let store = seeded();
        let geo = GeoIndex::default();
        let query = RestaurantQuery {
            neighborhood: Some("Atlantis".into()),
            ..RestaurantQuery::default()
        };
        let results = find_restaurants(&store, &geo, &query).unwrap();
        assert!(results.records.is_empty());
        assert!(results.expanded_to.is_empty());
    }

    #[test]
    fn synonyms_expand_to_cuisines() {
        assert_eq!(expand_query("sushi"), vec![Cuisine::Japanese]);
        assert_eq!(expand_query("Best TACOS in town"), vec![Cuisine::Mexican]);
        assert_eq!(expand_query("Asian Fusion")[0], Cuisine::AsianFusion);
        assert!(expand_query("cafecito").contains(&Cuisine::Cafe));
        assert!(expand_query("ice cream").contains(&Cuisine::Dessert));
        assert!(expand_query("nothing relevant").is_empty());
        assert!(expand_query("delete").is_empty());
    }

    #[test]
    fn text_search_merges_name_and_cuisine_hits() {
        let store = seeded();
        let by_name = text_search(&store, "carreta", 10).unwrap();
        assert_eq!(by_name.len(), 1);

        let sushi = text_search(&store, "sushi", 10).unwrap();
        assert_eq!(sushi.len(), 1);
        assert_eq!(sushi[0].name(), "Zuma");

        // "pizza" matches Joe's by name and by cuisine; it appears once
        let pizza = text_search(&store, "pizza", 10).unwrap();
        assert_eq!(pizza.len(), 1);

        let asian = text_search(&store, "asian", 2).unwrap();
        assert_eq!(asian.len(), 2);
        assert!(text_search(&store, "   ", 10).unwrap().is_empty());
    }
}
