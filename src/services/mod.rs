//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `filter.rs`: client-side predicate filter over cafes.
//! - `geo.rs`: coordinate extraction from map links, with fallback.
//! - `orchestrator.rs`: search-vs-all decision, cache-aware fetch, add/random.
//! - `cache.rs`: on-disk query cache with freshness and eviction windows.
//! - `session.rs`: interactive state: criteria, shared selection, request tracking.
//! - `view.rs`: list/map view state and text rendering.
//! - `output.rs`: JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod cache;
pub mod filter;
pub mod geo;
pub mod orchestrator;
pub mod output;
pub mod session;
pub mod view;
