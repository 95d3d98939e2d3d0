//! # Shepherd
//!
//! Federated search over a church's record stores, producing context for a
//! language-model answer step.
//!
//! A staff question ("Who is Alex Miller?", "Is there an Easter brunch?")
//! is fanned out to the people directory, gathering types, calendar events,
//! and small groups. The findings are merged into one **context string**
//! for the model, while a separate **diagnostic trace** records what each
//! store returned for operators.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//! │ CLI/HTTP │──▶│ Orchestrator │──▶│ HttpBackend  │──▶ record-store API
//! │          │◀──│ (core)       │◀──│ (reqwest)    │
//! └──────────┘   └──────────────┘   └──────────────┘
//!      │
//!      ▼
//! (context, diagnostics)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export PCO_APP_ID=... PCO_SECRET=...
//! shepherd sources                      # list the stores a search queries
//! shepherd probe                        # which organization do we reach?
//! shepherd search "Alex Miller" --diagnostics
//! shepherd serve                        # JSON API for the chat layer
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment credentials |
//! | [`client`] | `reqwest` implementation of the core `Backend` trait |
//! | [`search`] | Search and probe commands |
//! | [`sources`] | Source listing command |
//! | [`server`] | HTTP API server |
//!
//! The orchestrator, source adapters, and record model live in the
//! `shepherd-core` crate.

pub mod client;
pub mod config;
pub mod search;
pub mod server;
pub mod sources;
