//! HTTP calling layer shared by every tracking endpoint.

mod caller;

pub use caller::{HttpCaller, TlsPolicy};
