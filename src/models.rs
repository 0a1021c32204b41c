use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::license::definition::LicenseNode;

/// Bill-of-materials report as exported by the knowledge base.
#[derive(Debug, Clone, Deserialize)]
pub struct BomReport {
    #[serde(default)]
    pub components: Vec<BomComponent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomComponent {
    pub component_name: String,
    #[serde(default)]
    pub component_version_name: String,
    /// Absent when the knowledge base has no license data for the component.
    #[serde(default)]
    pub license: Option<LicenseNode>,
}

/// One evaluated component, as shown in the reports.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentLicense {
    pub name: String,
    pub version: String,
    /// Knowledge-base id of the component's top-level license entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_id: Option<Uuid>,
    pub license_display: String,
    pub risk: LicenseRisk,
    pub verdict: PolicyVerdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseRisk {
    Permissive,
    WeakCopyleft,
    StrongCopyleft,
    Proprietary,
    Unknown,
}

impl std::fmt::Display for LicenseRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LicenseRisk::Permissive => write!(f, "Permissive"),
            LicenseRisk::WeakCopyleft => write!(f, "Weak Copyleft"),
            LicenseRisk::StrongCopyleft => write!(f, "Strong Copyleft"),
            LicenseRisk::Proprietary => write!(f, "Proprietary"),
            LicenseRisk::Unknown => write!(f, "Unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyVerdict {
    Pass,
    Warn,
    Error,
}

impl std::fmt::Display for PolicyVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyVerdict::Pass => write!(f, "pass"),
            PolicyVerdict::Warn => write!(f, "warn"),
            PolicyVerdict::Error => write!(f, "error"),
        }
    }
}
