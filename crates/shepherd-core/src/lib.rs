//! # Shepherd Core
//!
//! Runtime-agnostic logic for Shepherd: the record model, the [`Backend`]
//! abstraction, the per-store source adapters, and the federated search
//! orchestrator that merges their findings into a context string and a
//! separate diagnostic trace.
//!
//! This crate contains no tokio, reqwest, or filesystem I/O. The HTTP
//! backend client lives in the `shepherd` crate.
//!
//! ```text
//!  query ──▶ Orchestrator ──▶ OrgProbe ─┐
//!                         ├─▶ People ───┤ (retry on empty)
//!                         ├─▶ Gatherings┤
//!                         ├─▶ Calendar ─┤──▶ Backend::call
//!                         └─▶ Groups ───┘
//!                 │
//!                 ▼
//!    (context string, diagnostic trace)
//! ```
//!
//! [`Backend`]: backend::Backend

pub mod backend;
pub mod diagnostics;
pub mod models;
pub mod retry;
pub mod search;
pub mod sources;
