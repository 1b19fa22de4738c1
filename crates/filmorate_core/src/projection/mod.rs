//! Read-side projections over entities and relation edges.
//!
//! Everything here is a pure function: no storage access, no locking, no
//! logging. Callers pass in a snapshot and get a deterministic answer.

pub mod friendship;
pub mod popularity;
