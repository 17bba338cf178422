//! HTTP API for the quiz solver.
//!
//! ## Endpoints
//!
//! - `GET /` - Health check
//! - `POST /quiz` - Validate `{email, secret, url}` and run one solve session

mod routes;
pub mod types;

pub use routes::serve;
pub use types::*;
