use crate::infra::InMemoryQueueStore;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use ride_dispatch::dispatch::{
    DispatchService, OrderCsvImporter, OrderId, OrderRequest, PriorityClass, QueueBoard,
    QueueSummary,
};
use ride_dispatch::error::AppError;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Order CSV export to seed the board with instead of the built-in sample.
    #[arg(long)]
    pub(crate) orders_csv: Option<PathBuf>,
    /// Dispatch this many orders from the head of each queue after seeding.
    #[arg(long, default_value_t = 0)]
    pub(crate) dispatch: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Order CSV export (order_id,pricing_model,revenue_score,created_at,...)
    #[arg(long)]
    pub(crate) orders_csv: PathBuf,
    /// Print the resulting board as JSON instead of a text listing
    #[arg(long)]
    pub(crate) json: bool,
}

/// Outcome of admitting a batch of requests into a fresh board.
pub(crate) struct AdmissionRun {
    pub(crate) service: DispatchService<InMemoryQueueStore>,
    pub(crate) admitted: usize,
    pub(crate) rejected: Vec<(Option<OrderId>, String)>,
}

pub(crate) fn admit_all(requests: Vec<OrderRequest>) -> AdmissionRun {
    let service = DispatchService::new(Arc::new(InMemoryQueueStore::default()));
    let mut admitted = 0;
    let mut rejected = Vec::new();

    for request in requests {
        let order_id = request.order_id.clone();
        match service.submit(request) {
            Ok(_) => admitted += 1,
            Err(err) => rejected.push((order_id, err.to_string())),
        }
    }

    AdmissionRun {
        service,
        admitted,
        rejected,
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        orders_csv,
        dispatch,
    } = args;

    println!("Ride dispatch priority queue demo");
    let (requests, source) = match orders_csv {
        Some(path) => {
            let requests = OrderCsvImporter::from_path(&path)?;
            (requests, format!("CSV export {}", path.display()))
        }
        None => (
            sample_orders(Utc::now()),
            "built-in sample orders".to_string(),
        ),
    };
    println!("Data source: {source}");

    let run = admit_all(requests);
    render_admissions(&run);

    let board = run.service.board()?;
    render_board(&board);
    render_summary(&board.summary());

    if dispatch > 0 {
        println!("\nDispatching up to {dispatch} order(s) per class");
        for priority in PriorityClass::ordered() {
            for _ in 0..dispatch {
                match run.service.dispatch_next(priority)? {
                    Some(order) => println!(
                        "- {priority}: dispatched {} (score {:.2}, created {})",
                        order.order_id,
                        order.revenue_score,
                        order.created_at.format("%H:%M:%S")
                    ),
                    None => {
                        println!("- {priority}: queue empty");
                        break;
                    }
                }
            }
        }

        let status = run.service.status()?;
        println!(
            "Remaining: P0 {} | P1 {} | P2 {}",
            status.p0, status.p1, status.p2
        );
    }

    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { orders_csv, json } = args;
    let requests = OrderCsvImporter::from_path(&orders_csv)?;
    let run = admit_all(requests);
    let board = run.service.board()?;

    if json {
        let rejected: Vec<_> = run
            .rejected
            .iter()
            .map(|(order_id, reason)| json!({ "order_id": order_id, "reason": reason }))
            .collect();
        let payload = json!({
            "queues": board.view(),
            "rejected": rejected,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(rendered) => println!("{rendered}"),
            Err(err) => println!("Board payload unavailable: {err}"),
        }
        return Ok(());
    }

    println!("Imported {}", orders_csv.display());
    render_admissions(&run);
    render_board(&board);
    Ok(())
}

fn render_admissions(run: &AdmissionRun) {
    println!(
        "Admitted {} order(s), rejected {}",
        run.admitted,
        run.rejected.len()
    );
    for (order_id, reason) in &run.rejected {
        let label = order_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "<unnamed>".to_string());
        println!("  - {label}: {reason}");
    }
}

pub(crate) fn render_board(board: &QueueBoard) {
    for priority in PriorityClass::ordered() {
        let queue = board.queue(priority);
        println!(
            "\n{} {} [{}] ({} queued)",
            priority,
            priority.label(),
            priority.ordering().label(),
            queue.len()
        );
        if queue.is_empty() {
            println!("  (empty)");
            continue;
        }

        for (index, order) in queue.iter().enumerate() {
            let customer = order
                .payload
                .get("customer")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("-");
            println!(
                "  {:>2}. {} | score {:>8.2} | created {} | {}",
                index + 1,
                order.order_id,
                order.revenue_score,
                order.created_at.format("%Y-%m-%d %H:%M:%S"),
                customer
            );
        }
    }
}

fn render_summary(summary: &QueueSummary) {
    println!("\nQueue analytics ({} orders)", summary.total_orders);
    for entry in &summary.classes {
        let mean = entry
            .mean_revenue_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        let top = entry
            .top_revenue_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        let head = entry
            .head_order_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "- {}: {} queued | mean score {} | top score {} | next up {}",
            entry.priority, entry.count, mean, top, head
        );
    }
}

// (id, pricing model, revenue score, minutes ago, customer, route)
const SAMPLE_ORDERS: [(&str, &str, f64, i64, &str, &str); 9] = [
    ("ord-c-101", "CONTRACTED", 12.0, 42, "Harbor Logistics", "Pier 39 -> SFO"),
    ("ord-s-201", "STANDARD", 18.5, 40, "J. Alvarez", "Mission -> SOMA"),
    ("ord-x-301", "CUSTOM", 64.0, 35, "Nightline Events", "Fort Mason -> Presidio"),
    ("ord-s-202", "STANDARD", 31.0, 30, "R. Chen", "Oakland -> Berkeley"),
    ("ord-c-102", "CONTRACTED", 3.5, 25, "Harbor Logistics", "SFO -> Embarcadero"),
    ("ord-z-401", "SURGE", 90.0, 20, "K. Osei", "Castro -> Marina"),
    ("ord-s-203", "STANDARD", 18.5, 15, "M. Novak", "Daly City -> Sunset"),
    ("ord-x-302", "CUSTOM", -4.0, 10, "Bay Film Crew", "Treasure Island -> SOMA"),
    ("ord-c-103", "CONTRACTED", 40.0, 5, "Civic Health", "UCSF -> Mission Bay"),
];

pub(crate) fn sample_orders(now: DateTime<Utc>) -> Vec<OrderRequest> {
    SAMPLE_ORDERS
        .iter()
        .map(|&(id, pricing_model, revenue_score, minutes_ago, customer, route)| {
            let mut payload = BTreeMap::new();
            payload.insert("customer".to_string(), json!(customer));
            payload.insert("route".to_string(), json!(route));

            OrderRequest {
                order_id: Some(OrderId::from(id)),
                pricing_model: Some(pricing_model.to_string()),
                revenue_score,
                created_at: Some(now - Duration::minutes(minutes_ago)),
                payload,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn sample_orders_populate_every_class_and_reject_surge() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let run = admit_all(sample_orders(now));

        assert_eq!(run.admitted, 8);
        assert_eq!(run.rejected.len(), 1);
        assert_eq!(
            run.rejected[0].0.as_ref().map(OrderId::as_str),
            Some("ord-z-401")
        );

        let board = run.service.board().expect("board");
        let standard: Vec<&str> = board
            .queue(PriorityClass::P1)
            .iter()
            .map(|order| order.order_id.as_str())
            .collect();
        assert_eq!(standard, ["ord-s-202", "ord-s-201", "ord-s-203"]);

        let contracted: Vec<&str> = board
            .queue(PriorityClass::P0)
            .iter()
            .map(|order| order.order_id.as_str())
            .collect();
        assert_eq!(contracted, ["ord-c-101", "ord-c-102", "ord-c-103"]);
    }
}
