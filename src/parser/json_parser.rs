// Tolerant JSON parsing for business-like objects from any catalog
use crate::model::{Candidate, Coordinates, ParserError, PriceSignal, Source};
use crate::parser::Parser;
use crate::utils::{collapse_whitespace, non_empty};
use serde_json::{Map, Value};
use tracing::warn;

/// Envelope keys that wrap the item array.
const ENVELOPE_KEYS: [&str; 5] = ["businesses", "results", "data", "items", "places"];

const ID_KEYS: [&str; 4] = ["id", "place_id", "fsq_id", "external_id"];
const NAME_KEYS: [&str; 3] = ["name", "business_name", "title"];
const DESCRIPTION_KEYS: [&str; 3] = ["description", "summary", "/editorial_summary/overview"];
const ADDRESS_KEYS: [&str; 5] = [
    "formatted_address",
    "address",
    "vicinity",
    "/location/formatted_address",
    "/location/address1",
];
const PHONE_KEYS: [&str; 4] = ["display_phone", "formatted_phone_number", "phone", "international_phone_number"];
const WEBSITE_KEYS: [&str; 2] = ["website", "url"];
const PRICE_KEYS: [&str; 2] = ["price", "price_level"];
const REVIEW_COUNT_KEYS: [&str; 3] = ["review_count", "user_ratings_total", "reviewCount"];

/// (latitude, longitude) pointer pairs, tried in order.
const COORDINATE_KEYS: [(&str, &str); 5] = [
    ("/latitude", "/longitude"),
    ("/lat", "/lng"),
    ("/coordinates/latitude", "/coordinates/longitude"),
    ("/geometry/location/lat", "/geometry/location/lng"),
    ("/geocodes/main/latitude", "/geocodes/main/longitude"),
];

pub struct JsonCandidateParser {
    source: Source,
}

impl JsonCandidateParser {
    pub fn new(source: Source) -> Self {
        Self { source }
    }

    fn parse_item(&self, item: &Map<String, Value>) -> Option<Candidate> {
        let name = first_string(item, &NAME_KEYS)?;

        let mut candidate = Candidate::new(self.source, name);
        candidate.external_ref = first_string(item, &ID_KEYS);
        candidate.description = first_string(item, &DESCRIPTION_KEYS);
        candidate.categories = categories(item);
        candidate.price = PRICE_KEYS.iter().find_map(|key| price_signal(item.get(*key)?));
        candidate.address = first_string(item, &ADDRESS_KEYS).or_else(|| display_address(item));
        candidate.phone = first_string(item, &PHONE_KEYS);
        candidate.website = first_string(item, &WEBSITE_KEYS);
        candidate.coordinates = coordinates(item);
        candidate.rating = item.get("rating").and_then(Value::as_f64);
        candidate.review_count = REVIEW_COUNT_KEYS
            .iter()
            .find_map(|key| item.get(*key)?.as_u64())
            .and_then(|count| u32::try_from(count).ok());
        Some(candidate)
    }
}

impl Parser for JsonCandidateParser {
    fn parse(&self, body: &str) -> Result<Vec<Candidate>, ParserError> {
        let payload: Value = serde_json::from_str(body)?;
        let items = item_array(&payload)?;

        let mut candidates = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let parsed = item.as_object().and_then(|object| self.parse_item(object));
            match parsed {
                Some(candidate) => candidates.push(candidate),
                None => warn!("⚠️ {} item #{} has no usable name, skipping", self.source, position),
            }
        }

        Ok(candidates)
    }
}

fn item_array(payload: &Value) -> Result<&Vec<Value>, ParserError> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(object) => ENVELOPE_KEYS
            .iter()
            .find_map(|key| object.get(*key)?.as_array())
            .ok_or_else(|| {
                let keys: Vec<&str> = object.keys().map(String::as_str).collect();
                ParserError::UnexpectedShape(format!("no item array among keys {:?}", keys))
            }),
        other => Err(ParserError::UnexpectedShape(format!("expected array or object, got {}", kind(other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Plain keys look up a field; keys starting with '/' are JSON pointers.
fn lookup<'a>(item: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if key.starts_with('/') {
        let mut current: Option<&Value> = None;
        for segment in key.trim_start_matches('/').split('/') {
            current = Some(match current {
                None => item.get(segment)?,
                Some(value) => value.get(segment)?,
            });
        }
        current
    } else {
        item.get(key)
    }
}

fn text(value: &Value) -> Option<String> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    non_empty(Some(collapse_whitespace(&raw)))
}

fn first_string(item: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(lookup(item, key)?))
}

/// Yelp-style `location.display_address` lines.
fn display_address(item: &Map<String, Value>) -> Option<String> {
    let lines: Vec<String> = lookup(item, "/location/display_address")?
        .as_array()?
        .iter()
        .filter_map(text)
        .collect();
    non_empty(Some(lines.join(", ")))
}

/// Category strings, `{alias, title}` objects and Google `types`, in order.
fn categories(item: &Map<String, Value>) -> Vec<String> {
    let mut tags = Vec::new();
    for key in ["categories", "types"] {
        let Some(values) = item.get(key).and_then(Value::as_array) else {
            continue;
        };
        for value in values {
            match value {
                Value::Object(object) => {
                    tags.extend(["alias", "title", "name"].iter().filter_map(|k| object.get(*k).and_then(text)));
                }
                other => tags.extend(text(other)),
            }
        }
    }
    if let Some(category) = item.get("category").and_then(text) {
        tags.push(category);
    }
    tags.dedup();
    tags
}

fn price_signal(value: &Value) -> Option<PriceSignal> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(PriceSignal::Symbols(s.trim().to_string())),
        Value::Number(n) => n.as_i64().map(PriceSignal::Level),
        _ => None,
    }
}

fn coordinates(item: &Map<String, Value>) -> Option<Coordinates> {
    COORDINATE_KEYS.iter().find_map(|(lat_key, lng_key)| {
        let latitude = number(lookup(item, lat_key)?)?;
        let longitude = number(lookup(item, lng_key)?)?;
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        valid.then(|| Coordinates::new(latitude, longitude))
    })
}

/// Numbers, or numeric strings as some municipal feeds send them.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
