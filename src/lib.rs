//! MLflow tracking client library
//!
//! This library resolves tracking-server credentials from several sources and
//! issues authenticated calls against the MLflow tracking REST API.

pub mod cli;
pub mod color;
pub mod commands;
pub mod creds;
pub mod error;
pub mod http;
pub mod tracking;

pub use error::{ClientError, Result};
