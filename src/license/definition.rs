use serde::Deserialize;
use uuid::Uuid;

/// Display name the knowledge base answers with for a license it has not mapped yet.
pub const MAPPING_PENDING: &str = "Mapping Pending";

/// How the children of a [`LicenseGroup`] combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LicenseKind {
    /// All component licenses apply (`AND`).
    Conjunctive,
    /// One of the alternatives may be chosen (`OR`).
    Disjunctive,
}

impl LicenseKind {
    /// Separator placed between rendered operands.
    pub fn separator(self) -> &'static str {
        match self {
            LicenseKind::Conjunctive => " AND ",
            LicenseKind::Disjunctive => " OR ",
        }
    }
}

/// Attributes carried by every node of a license tree.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseInfo {
    #[serde(default)]
    pub license_id: Option<Uuid>,
    /// License text as the scanner first reported it.
    #[serde(default)]
    pub discovered_as: Option<String>,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
    /// e.g. `OPEN_SOURCE`, `PROPRIETARY`
    #[serde(default)]
    pub ownership: String,
    /// e.g. `PERMISSIVE`, `WEAK_RECIPROCAL`, `RECIPROCAL`
    #[serde(default)]
    pub code_sharing: String,
}

impl LicenseInfo {
    /// Info with only a display name set.
    #[cfg(test)]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether this entry is still awaiting a license mapping upstream.
    pub fn is_mapping_pending(&self) -> bool {
        self.name == MAPPING_PENDING
    }
}

/// A combinator over a non-empty, ordered list of child nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct LicenseGroup {
    info: LicenseInfo,
    kind: LicenseKind,
    children: Vec<LicenseNode>,
}

impl LicenseGroup {
    /// Hands `info` back when `children` is empty: a childless entry is a
    /// named license, not a combinator.
    pub fn new(
        info: LicenseInfo,
        kind: LicenseKind,
        children: Vec<LicenseNode>,
    ) -> Result<Self, LicenseInfo> {
        if children.is_empty() {
            return Err(info);
        }
        Ok(Self {
            info,
            kind,
            children,
        })
    }

    pub fn info(&self) -> &LicenseInfo {
        &self.info
    }

    pub fn kind(&self) -> LicenseKind {
        self.kind
    }

    pub fn children(&self) -> &[LicenseNode] {
        &self.children
    }
}

/// A node in a license expression tree.
///
/// Deserializes from the upstream `LicenseDefinition` JSON shape; a node
/// whose `licenses` array is empty always becomes a [`LicenseNode::Leaf`],
/// whatever its `licenseType` says.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "LicenseDefinitionDto")]
pub enum LicenseNode {
    Leaf(LicenseInfo),
    Group(LicenseGroup),
}

impl LicenseNode {
    /// Build a node from its parts. An empty `children` list yields a leaf.
    pub fn new(info: LicenseInfo, kind: LicenseKind, children: Vec<LicenseNode>) -> Self {
        LicenseGroup::new(info, kind, children).map_or_else(LicenseNode::Leaf, LicenseNode::Group)
    }

    pub fn license_id(&self) -> Option<Uuid> {
        match self {
            LicenseNode::Leaf(info) => info.license_id,
            LicenseNode::Group(group) => group.info().license_id,
        }
    }

    /// Human-readable license expression, `"UNKNOWN"` when none can be shown.
    pub fn display(&self) -> String {
        super::render::render(self)
    }
}

#[cfg(test)]
impl LicenseNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        LicenseNode::Leaf(LicenseInfo::named(name))
    }

    /// Conjunctive node named after its operator. Empty `children` yields a leaf named `AND`.
    pub fn and(children: Vec<LicenseNode>) -> Self {
        Self::new(LicenseInfo::named("AND"), LicenseKind::Conjunctive, children)
    }

    /// Disjunctive node named after its operator. Empty `children` yields a leaf named `OR`.
    pub fn or(children: Vec<LicenseNode>) -> Self {
        Self::new(LicenseInfo::named("OR"), LicenseKind::Disjunctive, children)
    }

    pub fn info(&self) -> &LicenseInfo {
        match self {
            LicenseNode::Leaf(info) => info,
            LicenseNode::Group(group) => group.info(),
        }
    }
}

/// Wire shape of a license tree node as the report API sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LicenseDefinitionDto {
    #[serde(flatten)]
    info: LicenseInfo,
    /// Anything not explicitly conjunctive combines as `OR`.
    #[serde(default)]
    license_type: Option<LicenseKind>,
    #[serde(default)]
    licenses: Vec<LicenseNode>,
}

impl From<LicenseDefinitionDto> for LicenseNode {
    fn from(dto: LicenseDefinitionDto) -> Self {
        LicenseNode::new(
            dto.info,
            dto.license_type.unwrap_or(LicenseKind::Disjunctive),
            dto.licenses,
        )
    }
}
