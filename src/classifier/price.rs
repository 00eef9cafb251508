use crate::model::{PriceSignal, PriceTier, Source};

/// Maps a provider price signal onto the five-symbol scale.
///
/// Google reports 0-4 (0 is "free", folded into `$`). Yelp and the other
/// catalogs report `$`-`$$$$` or 1-4. Anything off-scale yields `None`.
pub fn normalize_price(source: Source, signal: &PriceSignal) -> Option<PriceTier> {
    match signal {
        PriceSignal::Symbols(symbols) => {
            let trimmed = symbols.trim();
            match trimmed.parse::<i64>() {
                Ok(level) => from_level(source, level),
                Err(_) => trimmed.parse::<PriceTier>().ok(),
            }
        }
        PriceSignal::Level(level) => from_level(source, *level),
    }
}

fn from_level(source: Source, level: i64) -> Option<PriceTier> {
    match (source, level) {
        (Source::GooglePlaces, 0) => Some(PriceTier::One),
        (_, 1) => Some(PriceTier::One),
        (_, 2) => Some(PriceTier::Two),
        (_, 3) => Some(PriceTier::Three),
        (_, 4) => Some(PriceTier::Four),
        (Source::Manual, 5) => Some(PriceTier::Five),
        _ => None,
    }
}
