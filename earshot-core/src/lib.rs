//! # Earshot Core Library
//!
//! Game-agnostic core for relaying vanilla (scripted) dialogue into an
//! external AI conversation service.
//!
//! Every line the host displays is offered to the [`Dispatcher`], which
//! decides between three fates:
//!
//! - **Forward**: a conversation is running and the speaker takes part in it.
//! - **Buffer**: no conversation is running; the exchange waits in the
//!   [`Backlog`] until the speaker's next conversation starts.
//! - **Forward and buffer**: a conversation is running without the speaker;
//!   the line is overheard now and remembered for when they join.
//!
//! Buffered exchanges survive save/load through the [`codec`] and the
//! [`record`] framing.
//!
//! ## Threading
//!
//! The host calls in synchronously from a single thread. Nothing in this
//! crate spawns, blocks on I/O, or retries delivery.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backlog;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod filter;
pub mod membership;
pub mod record;
pub mod service;
pub mod testing;
pub mod types;

pub use backlog::Backlog;
pub use config::EarshotConfig;
pub use dispatcher::{DispatchOutcome, Dispatcher, DropReason, ShownDialogue};
pub use error::RelayError;
pub use filter::{DialogueFilter, SuppressReason};
pub use membership::{MembershipOracle, ParticipantRoster, SharedRoster};
pub use service::{ConfigService, ConversationService, Notifier};
pub use types::*;
