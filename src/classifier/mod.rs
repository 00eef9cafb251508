// Rule-based cuisine and price inference
pub mod price;
pub mod rules;
pub mod tables;

use crate::model::{Candidate, Cuisine, PriceSignal, PriceTier, Source};
use crate::normalizer::name_key;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

pub use price::normalize_price;
pub use rules::{ClassificationRule, RuleSet, category_key};

/// Which table produced a cuisine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchLayer {
    KnownName,
    ProviderCategory,
    Keyword,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuisineMatch {
    pub primary: Cuisine,
    pub secondary: Option<Cuisine>,
    pub layer: MatchLayer,
}

impl CuisineMatch {
    pub fn cuisines(&self) -> Vec<Cuisine> {
        std::iter::once(self.primary).chain(self.secondary).collect()
    }

    pub fn is_default(&self) -> bool {
        self.layer == MatchLayer::Default
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub categories: &'a [String],
}

impl<'a> ClassificationInput<'a> {
    pub fn name_only(name: &'a str) -> Self {
        Self {
            name,
            description: None,
            categories: &[],
        }
    }
}

impl<'a> From<&'a Candidate> for ClassificationInput<'a> {
    fn from(candidate: &'a Candidate) -> Self {
        Self {
            name: &candidate.name,
            description: candidate.description.as_deref(),
            categories: &candidate.categories,
        }
    }
}

pub struct TextClassifier {
    known_names: RuleSet,
    categories: RuleSet,
    keywords: RuleSet,
    seafood: Option<Regex>,
    ultra_luxury: HashSet<String>,
}

impl TextClassifier {
    pub fn new(
        known_names: RuleSet,
        categories: RuleSet,
        keywords: RuleSet,
        seafood: Option<Regex>,
        ultra_luxury: HashSet<String>,
    ) -> Self {
        Self {
            known_names,
            categories,
            keywords,
            seafood,
            ultra_luxury,
        }
    }

    /// Classifier over the built-in Miami tables.
    pub fn standard() -> Self {
        let known_names = tables::KNOWN_VENUES
            .iter()
            .map(|(name, cuisine, secondary)| {
                let rule = ClassificationRule::exact_name(name, *cuisine);
                match secondary {
                    Some(second) => rule.with_secondary(*second),
                    None => rule,
                }
            })
            .collect();

        let categories = tables::PROVIDER_CATEGORIES
            .iter()
            .map(|(tag, cuisine)| ClassificationRule::category(tag, *cuisine))
            .collect();

        let mut keywords = RuleSet::new();
        for (label, pattern, cuisine) in tables::KEYWORD_PATTERNS {
            match ClassificationRule::pattern(label, pattern, *cuisine) {
                Ok(rule) => keywords.push(rule),
                Err(e) => warn!("⚠️ Skipping keyword rule '{}': {}", label, e),
            }
        }

        let seafood = match Regex::new(&format!("(?i){}", tables::SEAFOOD_PATTERN)) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("⚠️ Seafood pairing disabled: {}", e);
                None
            }
        };

        let ultra_luxury = tables::ULTRA_LUXURY_VENUES
            .iter()
            .map(|name| name_key(name))
            .collect();

        Self::new(known_names, categories, keywords, seafood, ultra_luxury)
    }

    /// First hit across known names, then provider categories, then keywords.
    /// Falls back to `default` and never fails.
    ///
    /// Non-venue keywords sit last in the keyword table, so a name that also
    /// mentions food keeps its food cuisine.
    pub fn classify(&self, input: &ClassificationInput<'_>, default: Cuisine) -> CuisineMatch {
        let (primary, secondary, layer) = if let Some(rule) = self.known_names.first_match(input.name) {
            (rule.apply(), rule.secondary(), MatchLayer::KnownName)
        } else if let Some(rule) = self.category_rule(input.categories) {
            (rule.apply(), rule.secondary(), MatchLayer::ProviderCategory)
        } else {
            let text = free_text(input);
            match self.keywords.first_match(&text) {
                Some(rule) => (rule.apply(), rule.secondary(), MatchLayer::Keyword),
                None => (default, None, MatchLayer::Default),
            }
        };

        let secondary = secondary.or_else(|| {
            (primary == Cuisine::Steakhouse && self.mentions_seafood(input)).then_some(Cuisine::Seafood)
        });

        CuisineMatch {
            primary,
            secondary,
            layer,
        }
    }

    pub fn classify_name(&self, name: &str, default: Cuisine) -> CuisineMatch {
        self.classify(&ClassificationInput::name_only(name), default)
    }

    pub fn is_ultra_luxury(&self, name: &str) -> bool {
        self.ultra_luxury.contains(&name_key(name))
    }

    /// Provider price normalized to the five-symbol scale; the ultra-luxury
    /// allow-list wins over whatever the provider said.
    pub fn infer_price(&self, name: &str, source: Source, signal: Option<&PriceSignal>) -> Option<PriceTier> {
        if self.is_ultra_luxury(name) {
            return Some(PriceTier::Five);
        }
        signal.and_then(|signal| normalize_price(source, signal))
    }

    /// First mapped tag, except that a Steakhouse tag anywhere wins so the
    /// seafood pairing applies whatever order the provider listed tags in.
    fn category_rule(&self, tags: &[String]) -> Option<&ClassificationRule> {
        let mut hits = tags.iter().filter_map(|tag| self.categories.first_match(tag));
        let first = hits.next()?;
        if first.apply() == Cuisine::Steakhouse {
            return Some(first);
        }
        Some(hits.find(|rule| rule.apply() == Cuisine::Steakhouse).unwrap_or(first))
    }

    fn mentions_seafood(&self, input: &ClassificationInput<'_>) -> bool {
        let Some(seafood) = &self.seafood else {
            return false;
        };
        seafood.is_match(&free_text(input)) || input.categories.iter().any(|tag| seafood.is_match(tag))
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::standard()
    }
}

fn free_text(input: &ClassificationInput<'_>) -> String {
    match input.description {
        Some(description) => format!("{} {}", input.name, description).to_lowercase(),
        None => input.name.to_lowercase(),
    }
}
