//! # Database module — PostgreSQL-backed [`store::Store`]
//!
//! Entirely gated behind `#[cfg(feature = "server")]` so builds that only need
//! the rules and the in-memory store never pull in SQLx or Tokio networking.
//!
//! ## Design
//!
//! The pool is a **lazy, process-wide singleton** backed by a [`tokio::sync::OnceCell`].
//! The first call to [`get_pool`] reads `DATABASE_URL` from the environment (via `dotenvy`),
//! opens a pool with up to 5 connections, creates the schema if it is missing,
//! and caches the result for all subsequent callers.
//!
//! [`PgStore`] implements [`store::Store`] over that pool. Email uniqueness and
//! the secret → user reference are enforced by the schema itself (`UNIQUE`,
//! `REFERENCES ... ON DELETE CASCADE`), and constraint violations are mapped
//! back to [`store::StoreError`].
//!
//! ## Re-exports
//!
//! - [`get_pool`]: returns `&'static PgPool`, initialising it on first use.
//! - [`PgStore`]: the store implementation.

#[cfg(feature = "server")]
mod pg;
#[cfg(feature = "server")]
mod pool;

#[cfg(feature = "server")]
pub use pg::PgStore;
#[cfg(feature = "server")]
pub use pool::{get_pool, init_schema, DbError};
