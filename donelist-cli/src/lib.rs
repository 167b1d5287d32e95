//! # Donelist CLI
//!
//! The `donelist` binary: `serve` runs the HTTP task service, `ui` runs
//! an interactive client session. The client keeps its view in a single
//! serializable state object and resynchronizes with the server after
//! every mutation; stale list responses are discarded via a monotonic
//! request id.

pub mod api;
pub mod render;
pub mod repl;
pub mod session;

pub use api::{ApiClient, ApiClientError};
pub use session::{EditDraft, FetchTicket, Phase, Session, ViewState};
