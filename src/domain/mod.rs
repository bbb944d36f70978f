//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep catalog entities, filter criteria and report structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs`: cafe entity, filter criteria, coordinates, view/report structs.
//! - `constants.rs`: fallback map location, cache windows, default endpoint.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod constants;
pub mod models;
