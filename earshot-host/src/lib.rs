//! # earshot-host: Host Integration for Earshot
//!
//! This crate sits between a game host and the game-agnostic `earshot-core`
//! library.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │                Game host                 │
//! │  subtitle hook   script calls   co-save  │
//! │        │              │            │     │
//! │        ▼              ▼            ▼     │
//! │  ┌────────────────────────────────────┐  │
//! │  │           earshot-host             │  │
//! │  │  hooks ─► events ─► RelayPlugin    │  │
//! │  │             bridge ──┘    │        │  │
//! │  │                           ▼        │  │
//! │  │   earshot-core      earshot-service│  │
//! │  └────────────────────────────────────┘  │
//! └──────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `events`: host notifications as plain data
//! - `hooks`: constructors the host glue calls to build events
//! - `bridge`: raw host data to core types (response joining, name fallback, keys)
//! - `plugin`: lifecycle owner (startup, event handling, save/load/revert)
//! - `logging`: `tracing-subscriber` initialisation

pub mod bridge;
pub mod events;
pub mod hooks;
pub mod logging;
pub mod plugin;

pub use events::{HostEvent, RawDialogue};
pub use plugin::RelayPlugin;
