use chrono::Local;
use clap::Args;
use ride_dispatch::config::AppConfig;
use ride_dispatch::dispatch::QueueStatus;
use ride_dispatch::error::AppError;
use ride_dispatch::telemetry;
use std::time::Duration;
use tracing::{info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Args, Debug, Default)]
pub(crate) struct WatchArgs {
    /// Base URL of the dispatch service (defaults to DISPATCH_API_URL)
    #[arg(long)]
    pub(crate) api_url: Option<String>,
    /// Seconds between refreshes (defaults to DISPATCH_REFRESH_SECS)
    #[arg(long)]
    pub(crate) interval_secs: Option<u64>,
    /// Stop after this many refreshes instead of running until interrupted
    #[arg(long)]
    pub(crate) iterations: Option<u64>,
}

pub(crate) fn status_url(api_url: &str) -> String {
    format!("{}/api/v1/queues/status", api_url.trim_end_matches('/'))
}

pub(crate) async fn run_watch(args: WatchArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let api_url = args.api_url.unwrap_or(config.dashboard.api_url);
    let period = args
        .interval_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(config.dashboard.refresh_interval);
    let url = status_url(&api_url);

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(AppError::upstream)?;

    info!(%url, period_secs = period.as_secs(), "watching queue status");

    let mut interval = tokio::time::interval(period);
    let mut refreshes = 0u64;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    while !limit_reached(args.iterations, refreshes) {
        tokio::select! {
            _ = &mut shutdown => {
                info!("watch cancelled");
                break;
            }
            _ = interval.tick() => {
                match fetch_status(&client, &url).await {
                    Ok(status) => println!("{}", render_status(&status)),
                    // A missed refresh is reported and retried on the next tick.
                    Err(err) => warn!(%url, error = %err, "queue status refresh failed"),
                }

                refreshes += 1;
            }
        }
    }

    Ok(())
}

fn limit_reached(iterations: Option<u64>, refreshes: u64) -> bool {
    iterations.is_some_and(|limit| refreshes >= limit)
}

async fn fetch_status(client: &reqwest::Client, url: &str) -> Result<QueueStatus, reqwest::Error> {
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<QueueStatus>()
        .await
}

pub(crate) fn render_status(status: &QueueStatus) -> String {
    format!(
        "[{}] P0 {:>3} | P1 {:>3} | P2 {:>3} | total {:>4}",
        Local::now().format("%H:%M:%S"),
        status.p0,
        status.p1,
        status.p2,
        status.total()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url_tolerates_trailing_slash() {
        assert_eq!(
            status_url("http://127.0.0.1:3000/"),
            "http://127.0.0.1:3000/api/v1/queues/status"
        );
        assert_eq!(
            status_url("http://dispatch.local"),
            "http://dispatch.local/api/v1/queues/status"
        );
    }

    #[test]
    fn zero_iterations_stop_before_the_first_request() {
        assert!(limit_reached(Some(0), 0));
        assert!(!limit_reached(Some(2), 1));
        assert!(limit_reached(Some(2), 2));
        assert!(!limit_reached(None, 10_000));
    }

    #[test]
    fn render_status_lists_each_class_and_total() {
        let rendered = render_status(&QueueStatus {
            p0: 2,
            p1: 5,
            p2: 0,
        });
        assert!(rendered.contains("P0   2"));
        assert!(rendered.contains("P1   5"));
        assert!(rendered.ends_with("total    7"));
    }
}
