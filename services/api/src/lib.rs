mod cli;
mod infra;
mod quiz;
mod routes;
mod server;

use mission_secure::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
