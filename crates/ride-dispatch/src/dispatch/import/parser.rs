use std::collections::BTreeMap;
use std::io::Read;

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::OrderImportError;
use crate::dispatch::domain::{OrderId, OrderRequest};

const ORDER_ID: &str = "order_id";
const PRICING_MODEL: &str = "pricing_model";
const REVENUE_SCORE: &str = "revenue_score";
const CREATED_AT: &str = "created_at";

pub(crate) fn parse_orders<R: Read>(reader: R) -> Result<Vec<OrderRequest>, OrderImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_ascii_lowercase())
        .collect();

    if !headers.iter().any(|header| header == REVENUE_SCORE) {
        return Err(OrderImportError::MissingColumn(REVENUE_SCORE));
    }

    let mut orders = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        // header occupies line 1
        let line = index + 2;
        orders.push(parse_row(&headers, &record, line)?);
    }

    Ok(orders)
}

fn parse_row(
    headers: &[String],
    record: &csv::StringRecord,
    line: usize,
) -> Result<OrderRequest, OrderImportError> {
    let mut order_id = None;
    let mut pricing_model = None;
    let mut revenue_score = None;
    let mut created_at = None;
    let mut payload = BTreeMap::new();

    for (header, cell) in headers.iter().zip(record.iter()) {
        if cell.is_empty() {
            continue;
        }

        match header.as_str() {
            ORDER_ID => order_id = Some(OrderId(cell.to_string())),
            PRICING_MODEL => pricing_model = Some(cell.to_string()),
            REVENUE_SCORE => {
                let score = cell
                    .parse::<f64>()
                    .map_err(|_| OrderImportError::InvalidField {
                        line,
                        column: REVENUE_SCORE,
                        value: cell.to_string(),
                    })?;
                revenue_score = Some(score);
            }
            CREATED_AT => {
                let timestamp =
                    parse_timestamp(cell).ok_or_else(|| OrderImportError::InvalidField {
                        line,
                        column: CREATED_AT,
                        value: cell.to_string(),
                    })?;
                created_at = Some(timestamp);
            }
            other => {
                payload.insert(other.to_string(), Value::String(cell.to_string()));
            }
        }
    }

    let revenue_score = revenue_score.ok_or_else(|| OrderImportError::InvalidField {
        line,
        column: REVENUE_SCORE,
        value: String::new(),
    })?;

    Ok(OrderRequest {
        order_id,
        pricing_model,
        revenue_score,
        created_at,
        payload,
    })
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_timestamp_for_tests(value: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(value)
}
