//! Personal finance records.
//!
//! These entities are independent of each other; the only shared constraint
//! is that every category value belongs to `FinanceCategory`.

use crate::model::entity::{impl_entity, impl_ordered, Unordered};
use crate::model::fields::Fields;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceCategory {
    Food,
    Transport,
    Housing,
    Utilities,
    Entertainment,
    Health,
    Shopping,
    Education,
    Subscriptions,
    Other,
}

impl FinanceCategory {
    pub const ALL: [FinanceCategory; 10] = [
        Self::Food,
        Self::Transport,
        Self::Housing,
        Self::Utilities,
        Self::Entertainment,
        Self::Health,
        Self::Shopping,
        Self::Education,
        Self::Subscriptions,
        Self::Other,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "food" | "groceries" => Some(Self::Food),
            "transport" | "transportation" => Some(Self::Transport),
            "housing" | "rent" => Some(Self::Housing),
            "utilities" => Some(Self::Utilities),
            "entertainment" => Some(Self::Entertainment),
            "health" => Some(Self::Health),
            "shopping" => Some(Self::Shopping),
            "education" => Some(Self::Education),
            "subscriptions" | "subscription" => Some(Self::Subscriptions),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    fn read(fields: &Fields<'_>) -> Self {
        fields.choice("category", Self::parse, Self::Other)
    }
}

/// Recurring monthly bill.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: f64,
    /// Day of month the bill is due, `1..=31`.
    pub due_day: u32,
    pub category: FinanceCategory,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(name: impl Into<String>, amount: f64, due_day: u32) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            amount: amount.max(0.0),
            due_day: due_day.clamp(1, 31),
            category: FinanceCategory::Other,
            paid: false,
            created_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            amount: fields.amount("amount"),
            due_day: fields.u32_in("dueDay", 1, 31, 1),
            category: FinanceCategory::read(fields),
            paid: fields.bool("paid"),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(Bill, Bill, bills, created);
impl Unordered for Bill {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub category: FinanceCategory,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(description: impl Into<String>, amount: f64, category: FinanceCategory) -> Self {
        Self {
            id: String::new(),
            description: description.into(),
            amount: amount.max(0.0),
            date: None,
            category,
            created_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            description: fields.string("description"),
            amount: fields.amount("amount"),
            date: fields.date("date"),
            category: FinanceCategory::read(fields),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(Expense, Expense, expenses, created);
impl Unordered for Expense {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub source: String,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Income {
    pub fn new(source: impl Into<String>, amount: f64) -> Self {
        Self {
            id: String::new(),
            source: source.into(),
            amount: amount.max(0.0),
            date: None,
            created_at: crate::model::fields::epoch(),
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            source: fields.string("source"),
            amount: fields.amount("amount"),
            date: fields.date("date"),
            created_at: fields.created_at(),
        })
    }
}

impl_entity!(Income, Income, incomes, created);
impl Unordered for Income {}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: String,
    pub name: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub order: f64,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            target_amount: target_amount.max(0.0),
            current_amount: 0.0,
            deadline: None,
            order: 0.0,
        }
    }

    /// Completion ratio in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            name: fields.string("name"),
            target_amount: fields.amount("targetAmount"),
            current_amount: fields.amount("currentAmount"),
            deadline: fields.date("deadline"),
            order: fields.order(),
        })
    }
}

impl_entity!(SavingsGoal, SavingsGoal, savings_goals);
impl_ordered!(SavingsGoal, root);

/// Monthly spending limit for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCategory {
    pub id: String,
    pub category: FinanceCategory,
    pub monthly_limit: f64,
    pub color: Option<String>,
    pub order: f64,
}

impl BudgetCategory {
    pub fn new(category: FinanceCategory, monthly_limit: f64) -> Self {
        Self {
            id: String::new(),
            category,
            monthly_limit: monthly_limit.max(0.0),
            color: None,
            order: 0.0,
        }
    }

    fn from_fields(id: String, fields: &Fields<'_>) -> Option<Self> {
        Some(Self {
            id,
            category: FinanceCategory::read(fields),
            monthly_limit: fields.amount("monthlyLimit"),
            color: fields.opt_string("color"),
            order: fields.order(),
        })
    }
}

impl_entity!(BudgetCategory, BudgetCategory, budget_categories);
impl_ordered!(BudgetCategory, root);
