use crate::model::PaymentKind;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Maps note keywords to a category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Built-in table. Order matters: the first rule with a matching keyword wins.
pub static DEFAULT_RULES: Lazy<Vec<CategoryRule>> = Lazy::new(|| {
    vec![
        CategoryRule::new("Salary", &["salary", "wage", "bonus", "income", "payroll"]),
        CategoryRule::new(
            "Dining",
            &[
                "dining", "meal", "delivery", "takeout", "restaurant", "breakfast", "lunch",
                "dinner", "drink",
            ],
        ),
        CategoryRule::new(
            "Transport",
            &["transport", "bus", "subway", "metro", "taxi", "train", "fuel", "gas"],
        ),
        CategoryRule::new(
            "Shopping",
            &["shopping", "buy", "supermarket", "grocery", "online order", "mall"],
        ),
        CategoryRule::new("Rent", &["rent", "lease", "mortgage"]),
        CategoryRule::new("Entertainment", &["entertainment", "movie", "game", "karaoke", "concert"]),
        CategoryRule::new("Medical", &["medical", "hospital", "medicine", "pharmacy", "checkup"]),
        CategoryRule::new("Education", &["education", "tuition", "course", "training", "book"]),
        CategoryRule::new("Transfer", &["transfer", "repayment", "loan"]),
        CategoryRule::new("Investment", &["investment", "fund", "stock", "dividend"]),
    ]
});

/// Assigns a category to a payment from its note.
#[derive(Debug, Clone)]
pub struct Categorizer {
    rules: Vec<CategoryRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.clone())
    }
}

impl Categorizer {
    /// Keywords are matched case-insensitively; blank keywords are dropped.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                category: rule.category.trim().to_string(),
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .filter(|rule| !rule.category.is_empty())
            .collect();
        Self { rules }
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// The category of the first rule with a keyword inside `note`; the
    /// kind's name when there is no note or nothing matches.
    pub fn categorize(&self, kind: PaymentKind, note: Option<&str>) -> String {
        let Some(note) = note.map(|n| n.trim().to_lowercase()) else {
            return kind.to_string();
        };
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| note.contains(k.as_str())))
            .map(|rule| rule.category.clone())
            .unwrap_or_else(|| kind.to_string())
    }
}
