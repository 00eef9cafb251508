use crate::model::Cuisine;
use crate::normalizer::name_key;
use regex::Regex;

/// What a rule compares its input against.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    /// Exact venue name, compared by `name_key`.
    ExactName(String),
    /// Provider category tag, compared by `category_key`.
    Category(String),
    /// Keyword pattern run over lowercased free text.
    Pattern(Regex),
}

/// One auditable (predicate, result) entry of a classification table.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    label: String,
    matcher: RuleMatcher,
    cuisine: Cuisine,
    secondary: Option<Cuisine>,
}

impl ClassificationRule {
    pub fn exact_name(name: &str, cuisine: Cuisine) -> Self {
        Self {
            label: name.to_string(),
            matcher: RuleMatcher::ExactName(name_key(name)),
            cuisine,
            secondary: None,
        }
    }

    pub fn category(tag: &str, cuisine: Cuisine) -> Self {
        Self {
            label: tag.to_string(),
            matcher: RuleMatcher::Category(category_key(tag)),
            cuisine,
            secondary: None,
        }
    }

    pub fn pattern(label: &str, pattern: &str, cuisine: Cuisine) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.to_string(),
            matcher: RuleMatcher::Pattern(Regex::new(&format!("(?i){}", pattern))?),
            cuisine,
            secondary: None,
        })
    }

    pub fn with_secondary(mut self, secondary: Cuisine) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, text: &str) -> bool {
        match &self.matcher {
            RuleMatcher::ExactName(key) => name_key(text) == *key,
            RuleMatcher::Category(key) => category_key(text) == *key,
            RuleMatcher::Pattern(regex) => regex.is_match(text),
        }
    }

    pub fn apply(&self) -> Cuisine {
        self.cuisine
    }

    pub fn secondary(&self) -> Option<Cuisine> {
        self.secondary
    }
}

/// Rules evaluated in insertion order; the first hit wins.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: ClassificationRule) {
        self.rules.push(rule);
    }

    pub fn first_match(&self, text: &str) -> Option<&ClassificationRule> {
        self.rules.iter().find(|rule| rule.matches(text))
    }
}

impl FromIterator<ClassificationRule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = ClassificationRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// "Sushi Bars", "sushi_bars" and "japanese_restaurant" style tags reduced to
/// one comparable key; a trailing "restaurant(s)" is dropped.
pub fn category_key(tag: &str) -> String {
    let key: String = tag
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    for suffix in ["restaurants", "restaurant"] {
        if let Some(stripped) = key.strip_suffix(suffix) {
            if !stripped.is_empty() {
                return stripped.to_string();
            }
        }
    }
    key
}
