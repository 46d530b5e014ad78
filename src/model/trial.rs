use resource_framework::Resource;
use serde::{Deserialize, Serialize};

pub type TrialId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialStatus {
    Active,
    Expired,
    Converted,
}

/// A time-boxed evaluation of a plan by a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: TrialId,
    pub tenant_id: String,
    pub plan: String,
    pub starts_at: String,
    pub ends_at: String,
    pub status: TrialStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialCreate {
    pub tenant_id: String,
    pub plan: String,
    pub starts_at: String,
    pub ends_at: String,
}

/// Trials can only be extended or closed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrialUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TrialStatus>,
}

impl Resource for Trial {
    const NAME: &'static str = "trials";
    type Id = TrialId;
    type Create = TrialCreate;
    type Update = TrialUpdate;
    type Out = Self;
}
