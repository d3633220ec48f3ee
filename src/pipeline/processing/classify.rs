use serde::{Deserialize, Serialize};

/// One keyword-matching rule: assigns `label` when any keyword occurs as a
/// substring of the lower-cased input text.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub label: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], label: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            label: label.to_string(),
        }
    }
}

/// An ordered rule table for one vocabulary field.
///
/// Rule order is load-bearing: the first rule whose any keyword matches
/// wins and the remaining rules are not evaluated. No match yields the
/// table's declared default.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<KeywordRule>,
    default: String,
}

impl RuleTable {
    pub fn new(rules: Vec<KeywordRule>, default: &str) -> Self {
        Self {
            rules,
            default: default.to_string(),
        }
    }

    /// Resolves `text_lower` against the rules in declared order.
    /// The caller is expected to have lower-cased the text already.
    pub fn resolve(&self, text_lower: &str) -> String {
        for rule in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|keyword| text_lower.contains(keyword.as_str()))
            {
                return rule.label.clone();
            }
        }
        self.default.clone()
    }
}

/// The four vocabulary tables used by the classifier, injected at
/// construction so tests can substitute alternate vocabularies.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    pub checkpoint_type: RuleTable,
    pub category: RuleTable,
    pub status: RuleTable,
    pub working_hours: RuleTable,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            checkpoint_type: RuleTable::new(
                vec![
                    KeywordRule::new(&["пешеход"], "pedestrian"),
                    KeywordRule::new(&["железнодорож", "ж/д"], "rail"),
                    KeywordRule::new(&["морск", "порт"], "sea"),
                    KeywordRule::new(&["речн"], "river"),
                    KeywordRule::new(&["аэропорт", "воздуш"], "air"),
                    KeywordRule::new(&["смешан"], "mixed"),
                ],
                "auto",
            ),
            category: RuleTable::new(
                vec![
                    KeywordRule::new(&["многосторон"], "international"),
                    KeywordRule::new(&["двусторон"], "bilateral"),
                    KeywordRule::new(&["местн"], "local"),
                ],
                "",
            ),
            status: RuleTable::new(
                vec![
                    KeywordRule::new(&["не функционирует", "закрыт"], "closed"),
                    KeywordRule::new(&["приостанов"], "suspended"),
                    KeywordRule::new(&["сезон"], "seasonal"),
                ],
                "active",
            ),
            working_hours: RuleTable::new(vec![KeywordRule::new(&["круглосуточ"], "24/7")], ""),
        }
    }
}

/// Controlled-vocabulary labels assigned from one description text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub checkpoint_type: String,
    pub category: String,
    pub status: String,
    pub working_hours: String,
}

/// Classifies free-text checkpoint descriptions into the controlled
/// vocabularies. The four output fields are computed independently from
/// the same lower-cased text; unmatched text falls through to each table's
/// default, never to an error.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    rules: ClassifierRules,
}

impl TextClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self { rules }
    }

    pub fn classify(&self, text: &str) -> Classification {
        let lower = text.to_lowercase();
        Classification {
            checkpoint_type: self.rules.checkpoint_type.resolve(&lower),
            category: self.rules.category.resolve(&lower),
            status: self.rules.status.resolve(&lower),
            working_hours: self.rules.working_hours.resolve(&lower),
        }
    }
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}
