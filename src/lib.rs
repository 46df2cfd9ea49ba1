//! # cookiebridge
//!
//! A cookie synchronization engine for local development.
//!
//! `cookiebridge` copies browser cookies from configured production origins
//! into a local development origin (the localhost family), keeping the two in
//! sync on navigation and on demand, and can clear the local jar again.
//!
//! ## Features
//!
//! - **Minimal mutations**: per cookie, skip identical values, update changed
//!   ones, copy new ones
//! - **Concurrent sources**: every enabled source syncs independently; one
//!   failing source never fails the batch
//! - **Deterministic outcomes**: structured copied/updated/skipped/total
//!   counts with per-cookie warnings
//! - **Observers**: best-effort multicast of transfer lifecycle events with
//!   in-place progress correlation
//! - **Persisted registry**: ordered, user-managed source list with a bounded
//!   transfer history
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cookiebridge::orchestrator::{OrchestratorConfig, TransferOrchestrator, TransferTrigger};
//! use cookiebridge::storage::MemoryKeyValueStore;
//! use cookiebridge::store::memory::MemoryCookieStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(MemoryCookieStore::new());
//!     let storage = Arc::new(MemoryKeyValueStore::new());
//!
//!     let orchestrator =
//!         TransferOrchestrator::new(store, storage, OrchestratorConfig::default());
//!     orchestrator.registry().add("https://app.example.com").await.unwrap();
//!
//!     let outcome = orchestrator
//!         .run_transfer(TransferTrigger::Manual, None)
//!         .await
//!         .unwrap();
//!     println!("copied {} cookies", outcome.total_copied);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error taxonomy and shared helpers
//! - [`origin`] - Local-target classification and origin normalization
//! - [`store`] - Cookie store adapter interface and in-memory jar
//! - [`storage`] - Persisted key-value state
//! - [`registry`] - Ordered source origin list
//! - [`engine`] - The synchronization engine
//! - [`orchestrator`] - Transfer lifecycle, observers, and history
//! - [`protocol`] - Tagged request/response messages for collaborators

pub mod base;
pub mod engine;
pub mod origin;
pub mod orchestrator;
pub mod protocol;
pub mod registry;
pub mod storage;
pub mod store;
