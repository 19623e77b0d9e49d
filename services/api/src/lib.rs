mod cli;
mod infra;
mod offline;
mod routes;
mod server;

use agro_ai::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
