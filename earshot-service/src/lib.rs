//! # earshot-service: Conversation Service Transport
//!
//! Delivers relayed dialogue to the external AI conversation service.
//!
//! The core only knows the [`ConversationService`](earshot_core::ConversationService)
//! trait; this crate provides the production implementation:
//!   - **Endpoint resolution**: the port comes from the host's integer
//!     settings (`HttpPort`), falling back to a configured default.
//!   - **HTTP delivery**: `POST {base_url}:{port}/{route}` with a JSON body
//!     `{"message": "..."}` and a hard timeout.
//!
//! # Threading
//!
//! ```text
//! host thread ── send_text ──► block_on(post) ──► service
//!                  (returns once the response or the timeout arrives)
//! ```
//!
//! Delivery is synchronous from the caller's point of view. The client owns
//! a private current-thread runtime, so hosts without an async runtime can
//! call it directly. Failures are reported, never retried.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod types;

pub use client::HttpConversationService;
pub use endpoint::resolve_endpoint;
pub use error::ServiceError;
pub use types::{AddMessageRequest, Endpoint};
