//! DTOs for every admin resource, each bound to its payloads through
//! [`Resource`](resource_framework::Resource).

pub mod admin;
pub mod event;
pub mod group;
pub mod team;
pub mod tenant;
pub mod trial;

pub use admin::*;
pub use event::*;
pub use group::*;
pub use team::*;
pub use tenant::*;
pub use trial::*;
