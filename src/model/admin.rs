use resource_framework::Resource;
use serde::{Deserialize, Serialize};

pub type AdminId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    TenantAdmin,
    Support,
}

/// A dashboard operator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Admin {
    pub id: AdminId,
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    /// Set for tenant-scoped roles.
    #[serde(default)]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminCreate {
    pub email: String,
    pub name: String,
    pub role: AdminRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
}

impl Resource for Admin {
    const NAME: &'static str = "admins";
    type Id = AdminId;
    type Create = AdminCreate;
    type Update = AdminUpdate;
    type Out = Self;
}
