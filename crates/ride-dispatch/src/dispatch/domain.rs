use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier wrapper for dispatch orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Commercial arrangement an order was priced under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
    Contracted,
    Standard,
    Custom,
}

impl PricingModel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Contracted, Self::Standard, Self::Custom]
    }

    /// Wire name, as sent by the order-creation forms.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contracted => "CONTRACTED",
            Self::Standard => "STANDARD",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three fixed priority buckets, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PriorityClass {
    P0,
    P1,
    P2,
}

impl PriorityClass {
    pub const fn ordered() -> [Self; 3] {
        [Self::P0, Self::P1, Self::P2]
    }

    pub const fn for_pricing_model(model: PricingModel) -> Self {
        match model {
            PricingModel::Contracted => Self::P0,
            PricingModel::Standard => Self::P1,
            PricingModel::Custom => Self::P2,
        }
    }

    pub const fn pricing_model(self) -> PricingModel {
        match self {
            Self::P0 => PricingModel::Contracted,
            Self::P1 => PricingModel::Standard,
            Self::P2 => PricingModel::Custom,
        }
    }

    pub const fn ordering(self) -> QueueOrdering {
        match self {
            Self::P0 => QueueOrdering::CreatedAtAscending,
            Self::P1 | Self::P2 => QueueOrdering::RevenueScoreDescending,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::P0 => "P0",
            Self::P1 => "P1",
            Self::P2 => "P2",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::P0 => "Contracted (FIFO)",
            Self::P1 => "Standard (by score)",
            Self::P2 => "Custom (by score)",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityClass {
    type Err = UnknownPriorityClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownPriorityClass(trimmed.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown priority class '{0}', expected P0, P1 or P2")]
pub struct UnknownPriorityClass(pub String);

/// Sort rule a priority class maintains under insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueOrdering {
    CreatedAtAscending,
    RevenueScoreDescending,
}

impl QueueOrdering {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreatedAtAscending => "first created, first served",
            Self::RevenueScoreDescending => "highest revenue score first",
        }
    }
}

/// Order as supplied by the order source; identity and timestamp may still be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub pricing_model: Option<String>,
    pub revenue_score: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Display-only fields (customer, route, vehicle type, ...) carried through untouched.
    #[serde(flatten)]
    pub payload: BTreeMap<String, Value>,
}

/// Order ready for classification: identity and timestamp fixed, pricing model unchecked.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub order_id: OrderId,
    pub pricing_model: Option<String>,
    pub revenue_score: f64,
    pub created_at: DateTime<Utc>,
    pub payload: BTreeMap<String, Value>,
}

/// Classified order as held in a priority queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub pricing_model: PricingModel,
    pub revenue_score: f64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub payload: BTreeMap<String, Value>,
}

impl Order {
    pub fn priority(&self) -> PriorityClass {
        PriorityClass::for_pricing_model(self.pricing_model)
    }
}

/// Where an admitted order landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub order_id: OrderId,
    pub priority: PriorityClass,
    /// Zero-based index within the class queue at the moment of insertion.
    pub position: usize,
    pub queue_len: usize,
}
