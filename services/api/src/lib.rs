mod cli;
mod infra;
mod render;
mod routes;
mod server;

use consent_form::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
