//! Routing of orders into priority classes.
//!
//! The mapping from pricing model to class covers the three known models and nothing
//! else. Any other label is rejected rather than defaulted into a class.

use std::str::FromStr;

use super::domain::{Order, OrderDraft, PriorityClass, PricingModel};
use super::queue::ClassQueue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error(
        "unknown pricing model '{}', expected CONTRACTED, STANDARD or CUSTOM",
        .value.as_deref().unwrap_or("<missing>")
    )]
    UnknownPricingModel { value: Option<String> },
}

impl FromStr for PricingModel {
    type Err = ClassificationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_pricing_model(Some(value))
    }
}

/// Parse a wire pricing-model label. Blank and absent labels both count as missing.
pub fn parse_pricing_model(raw: Option<&str>) -> Result<PricingModel, ClassificationError> {
    let trimmed = raw.map(str::trim).filter(|value| !value.is_empty());
    let Some(label) = trimmed else {
        return Err(ClassificationError::UnknownPricingModel { value: None });
    };

    PricingModel::ordered()
        .into_iter()
        .find(|model| model.as_str().eq_ignore_ascii_case(label))
        .ok_or_else(|| ClassificationError::UnknownPricingModel {
            value: Some(label.to_string()),
        })
}

pub fn classify(draft: &OrderDraft) -> Result<PriorityClass, ClassificationError> {
    let model = parse_pricing_model(draft.pricing_model.as_deref())?;
    Ok(PriorityClass::for_pricing_model(model))
}

/// Classify a draft and turn it into a queueable order.
pub fn admit(draft: OrderDraft) -> Result<(PriorityClass, Order), ClassificationError> {
    let pricing_model = parse_pricing_model(draft.pricing_model.as_deref())?;
    let order = Order {
        order_id: draft.order_id,
        pricing_model,
        revenue_score: draft.revenue_score,
        created_at: draft.created_at,
        payload: draft.payload,
    };
    Ok((PriorityClass::for_pricing_model(pricing_model), order))
}

/// Return `queue` with `order` inserted at the position its class ordering demands.
pub fn insert(mut queue: ClassQueue, order: Order) -> ClassQueue {
    queue.insert(order);
    queue
}
