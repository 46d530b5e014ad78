use resource_framework::Resource;
use serde::{Deserialize, Serialize};

pub type GroupId = String;

/// A set of teams inside one tenant. Groups are removed permanently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tenant_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub member_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupCreate {
    pub tenant_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Resource for Group {
    const NAME: &'static str = "groups";
    type Id = GroupId;
    type Create = GroupCreate;
    type Update = GroupUpdate;
    type Out = Self;
}
