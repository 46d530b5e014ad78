//! Per-resource clients. Each one fixes the URL layout, capabilities and
//! cache keys of its resource and dereferences to the generic
//! [`ResourceQueryFacade`](resource_framework::ResourceQueryFacade).

pub mod admin_client;
pub mod event_client;
pub mod group_client;
pub mod team_client;
pub mod tenant_client;
pub mod trial_client;

pub use admin_client::*;
pub use event_client::*;
pub use group_client::*;
pub use team_client::*;
pub use tenant_client::*;
pub use trial_client::*;
