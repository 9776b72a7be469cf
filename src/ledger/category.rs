use std::{collections::HashMap, fmt, str::FromStr};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::RecurrenceError;

/// Direction of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionKind::Income),
            "expense" => Ok(TransactionKind::Expense),
            other => Err(RecurrenceError::Validation(format!(
                "unknown transaction type `{}` (expected income or expense)",
                other
            ))),
        }
    }
}

/// Display attributes derived from a category name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub icon: &'static str,
    pub color: &'static str,
}

pub const DEFAULT_STYLE: CategoryStyle = CategoryStyle {
    icon: "tag",
    color: "#9E9E9E",
};

const EXPENSE_CATEGORIES: &[&str] = &[
    "food",
    "transport",
    "shopping",
    "bills",
    "entertainment",
    "health",
    "education",
    "housing",
    "other",
];

const INCOME_CATEGORIES: &[&str] = &["salary", "freelance", "investment", "gift", "other"];

static CATEGORY_STYLES: Lazy<HashMap<&'static str, CategoryStyle>> = Lazy::new(|| {
    [
        ("food", "utensils", "#FF7043"),
        ("transport", "car", "#42A5F5"),
        ("shopping", "shopping-bag", "#AB47BC"),
        ("bills", "receipt", "#EF5350"),
        ("entertainment", "film", "#FFCA28"),
        ("health", "heart-pulse", "#EC407A"),
        ("education", "book", "#5C6BC0"),
        ("housing", "home", "#8D6E63"),
        ("salary", "briefcase", "#66BB6A"),
        ("freelance", "laptop", "#26A69A"),
        ("investment", "trending-up", "#29B6F6"),
        ("gift", "gift", "#FFA726"),
        ("other", "more-horizontal", "#78909C"),
    ]
    .into_iter()
    .map(|(name, icon, color)| (name, CategoryStyle { icon, color }))
    .collect()
});

fn normalize(category: &str) -> String {
    category.trim().to_ascii_lowercase()
}

/// Looks up the icon and color for `category`, falling back to [`DEFAULT_STYLE`].
pub fn style_for(category: &str) -> CategoryStyle {
    CATEGORY_STYLES
        .get(normalize(category).as_str())
        .copied()
        .unwrap_or(DEFAULT_STYLE)
}

pub fn categories_for(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

pub fn is_known(kind: TransactionKind, category: &str) -> bool {
    let normalized = normalize(category);
    categories_for(kind)
        .iter()
        .any(|name| *name == normalized.as_str())
}
