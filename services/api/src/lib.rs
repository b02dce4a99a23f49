mod cli;
mod infra;
mod review;
mod routes;
mod server;

use agency_site::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
