//! # Lifecycle & Wiring
//!
//! Turns a [`DashboardConfig`] into a running [`Dashboard`]:
//!
//! 1. **Configuration** - JSON file plus `ADMIN_API_*` overrides
//! 2. **Shared services** - one HTTP transport, one query cache, one
//!    notification sink and one session hook for the whole process
//! 3. **Clients** - one per resource, all built on those services
//! 4. **Shutdown** - drops the clients and reports cache counters
//!
//! Swap the transport with [`DashboardBuilder::with_transport`] to run the
//! whole dashboard against a
//! [`MockTransport`](resource_framework::mock::MockTransport).

pub mod config;
pub mod dashboard;

pub use config::*;
pub use dashboard::*;
