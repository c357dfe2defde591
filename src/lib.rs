//! TagRelay - message intake with LLM tag and summary enrichment
//!
//! TagRelay relays user-submitted messages through a language-model
//! classification call and keeps the enriched result.
//!
//! ## Architecture
//!
//! ```text
//!  client ──POST /new──▶ ┌──────────────────┐ ──POST /──▶ ┌──────────────────────┐
//!                        │  Intake Service  │             │  Enrichment Service  │
//!  client ◀──GET /get─── │  RecordStore     │ ◀─{tags,──  │  Prompt → LLM → parse │
//!                        └──────────────────┘   summary}  └──────────┬───────────┘
//!                                                                    │ chat completion
//!                                                                    ▼
//!                                                           external LLM API
//! ```
//!
//! ## Modules
//!
//! - [`intake`]: submission endpoint, enrichment client, in-memory record store
//! - [`enrichment`]: prompt construction, completion backend, response parsing
//! - [`messenger`]: Messenger page webhook verification and event intake
//! - [`api`]: shared router layers (health, CORS, tracing) and server loop
//! - [`config`]: Configuration management

pub mod api;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod intake;
pub mod messenger;

pub use config::TagRelayConfig;
pub use error::{Error, Result};
