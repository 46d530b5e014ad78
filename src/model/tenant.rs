use resource_framework::Resource;
use serde::{Deserialize, Serialize};

pub type TenantId = String;

/// An organization using the platform.
///
/// # Resource
/// Tenants are soft-deleted (`deleted_at` is set) and can be restored or
/// purged; see [`TenantClient`](crate::clients::TenantClient).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub plan: Option<String>,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

fn active() -> bool {
    true
}

/// Payload for creating a new tenant.
#[derive(Debug, Clone, Serialize)]
pub struct TenantCreate {
    pub name: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Resource for Tenant {
    const NAME: &'static str = "tenants";
    type Id = TenantId;
    type Create = TenantCreate;
    type Update = TenantUpdate;
    type Out = Self;
}
