//! HTTP presentation surface.
//!
//! Exposes the session as JSON for a local browser frontend and turns the
//! frontend's intents (select file, switch mode, analyze) into calls on
//! `CoreState`. Routes are nested under `/api/`.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;
pub mod view;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
