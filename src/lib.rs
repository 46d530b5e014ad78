//! # Admin Dashboard
//!
//! The data-access layer of a multi-tenant admin dashboard, built on
//! [`resource_framework`].
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! DTOs for tenants, admins, groups, teams, trials and events. Each record
//! type implements [`Resource`](resource_framework::Resource), which ties it
//! to its create and update payloads.
//!
//! ### 2. The Interface ([`clients`])
//! One client per resource. A client fixes the resource's URLs, which
//! optional operations it has (restore, hard delete) and its cache keys, and
//! otherwise behaves exactly like the generic
//! [`ResourceQueryFacade`](resource_framework::ResourceQueryFacade).
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! Loads [`DashboardConfig`](lifecycle::DashboardConfig) and wires every
//! client onto one transport, one cache and one notification sink.
//!
//! ## Running the Demo
//!
//! ```bash
//! ADMIN_API_BASE_URL=http://localhost:8080/api/v1 RUST_LOG=info cargo run -- dashboard.json
//! ```

pub mod clients;
pub mod error;
pub mod lifecycle;
pub mod model;

pub use error::DashboardError;
pub use lifecycle::{Dashboard, DashboardConfig};
