mod cli;
mod demo;
mod infra;
mod routes;
mod server;
mod watch;

use ride_dispatch::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
