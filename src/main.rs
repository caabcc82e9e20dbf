//! mlflow-client - command-line front end for the MLflow tracking API.
//!
//! Argument parsing and dispatch live in the library; the binary only starts
//! the runtime.

#[tokio::main]
async fn main() {
  mlflow_client::cli::run().await;
}
