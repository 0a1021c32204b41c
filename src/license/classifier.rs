use crate::license::definition::{LicenseInfo, LicenseKind, LicenseNode};
use crate::license::render::{reduce, Operand, Reducer};
use crate::license::spdx::{classify_code_sharing, classify_ownership, classify_spdx_id, normalize};
use crate::models::LicenseRisk;

/// Classify a whole license tree.
///
/// `OR` groups take their most permissive operand, `AND` groups their most
/// restrictive one. Unresolved licenses are pruned exactly as in the display
/// string, and a tree that displays as `UNKNOWN` classifies as
/// [`LicenseRisk::Unknown`].
pub fn classify_tree(node: &LicenseNode) -> LicenseRisk {
    match reduce(node, &RiskReducer) {
        Ok(Operand::Resolved(risk)) => risk,
        _ => LicenseRisk::Unknown,
    }
}

struct RiskReducer;

impl Reducer for RiskReducer {
    type Output = LicenseRisk;

    fn leaf(&self, info: &LicenseInfo) -> LicenseRisk {
        classify_leaf(info)
    }

    fn combine(&self, kind: LicenseKind, operands: Vec<LicenseRisk>) -> LicenseRisk {
        match kind {
            LicenseKind::Disjunctive => most_permissive(&operands),
            LicenseKind::Conjunctive => most_restrictive(&operands),
        }
    }
}

/// Classify one license entry: SPDX id first, then its name and the text it
/// was discovered as, then the knowledge-base ownership and code-sharing
/// categories.
pub fn classify_leaf(info: &LicenseInfo) -> LicenseRisk {
    let by_id = info
        .spdx_id
        .as_deref()
        .map(classify_spdx_id)
        .unwrap_or(LicenseRisk::Unknown);

    [
        by_id,
        classify(&info.name),
        info.discovered_as
            .as_deref()
            .map(classify)
            .unwrap_or(LicenseRisk::Unknown),
        classify_ownership(&info.ownership),
        classify_code_sharing(&info.code_sharing),
    ]
    .into_iter()
    .find(|risk| *risk != LicenseRisk::Unknown)
    .unwrap_or(LicenseRisk::Unknown)
}

/// Classify a license name or flat SPDX expression.
///
/// Handles proprietary keywords, `/` as an `OR` shorthand, and
/// `WITH` exception clauses. Parenthesized expressions are not parsed.
pub fn classify(license: &str) -> LicenseRisk {
    let trimmed = license.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("unknown") {
        return LicenseRisk::Unknown;
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("proprietary") || lower.contains("commercial") {
        return LicenseRisk::Proprietary;
    }

    let normalized = normalize(trimmed).replace('/', " OR ");

    if normalized.contains(" OR ") {
        let risks: Vec<LicenseRisk> = normalized.split(" OR ").map(classify_single).collect();
        return most_permissive(&risks);
    }

    if normalized.contains(" AND ") {
        let risks: Vec<LicenseRisk> = normalized.split(" AND ").map(classify_single).collect();
        return most_restrictive(&risks);
    }

    classify_single(&normalized)
}

fn classify_single(id: &str) -> LicenseRisk {
    let base = id.split(" WITH ").next().unwrap_or(id);
    classify_spdx_id(&normalize(base))
}

const PERMISSIVE_FIRST: [LicenseRisk; 4] = [
    LicenseRisk::Permissive,
    LicenseRisk::WeakCopyleft,
    LicenseRisk::StrongCopyleft,
    LicenseRisk::Proprietary,
];

/// Least restrictive known risk; `Unknown` if none is known.
fn most_permissive(risks: &[LicenseRisk]) -> LicenseRisk {
    PERMISSIVE_FIRST
        .into_iter()
        .find(|r| risks.contains(r))
        .unwrap_or(LicenseRisk::Unknown)
}

/// Most restrictive known risk; `Unknown` if none is known.
fn most_restrictive(risks: &[LicenseRisk]) -> LicenseRisk {
    PERMISSIVE_FIRST
        .into_iter()
        .rev()
        .find(|r| risks.contains(r))
        .unwrap_or(LicenseRisk::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::license::definition::MAPPING_PENDING;

    fn spdx(id: &str) -> LicenseNode {
        LicenseNode::Leaf(LicenseInfo {
            spdx_id: Some(id.to_string()),
            ..LicenseInfo::named(format!("{id} license"))
        })
    }

    #[test]
    fn test_or_takes_most_permissive() {
        let node = LicenseNode::or(vec![spdx("MIT"), spdx("GPL-3.0")]);
        assert_eq!(classify_tree(&node), LicenseRisk::Permissive);
    }

    #[test]
    fn test_and_takes_most_restrictive() {
        let node = LicenseNode::and(vec![spdx("MIT"), spdx("GPL-3.0")]);
        assert_eq!(classify_tree(&node), LicenseRisk::StrongCopyleft);
    }

    #[test]
    fn test_and_with_pending_is_unknown() {
        let node = LicenseNode::and(vec![spdx("MIT"), LicenseNode::leaf(MAPPING_PENDING)]);
        assert_eq!(classify_tree(&node), LicenseRisk::Unknown);
    }

    #[test]
    fn test_or_ignores_pending() {
        let node = LicenseNode::or(vec![LicenseNode::leaf(MAPPING_PENDING), spdx("LGPL-2.1")]);
        assert_eq!(classify_tree(&node), LicenseRisk::WeakCopyleft);
    }

    #[test]
    fn test_leaf_falls_back_to_name_then_categories() {
        assert_eq!(classify_leaf(&LicenseInfo::named("Apache License 2.0")), LicenseRisk::Permissive);

        let vendor = LicenseInfo {
            ownership: "PROPRIETARY".to_string(),
            ..LicenseInfo::named("Acme EULA")
        };
        assert_eq!(classify_leaf(&vendor), LicenseRisk::Proprietary);

        let reciprocal = LicenseInfo {
            ownership: "OPEN_SOURCE".to_string(),
            code_sharing: "RECIPROCAL".to_string(),
            ..LicenseInfo::named("Some Copyleft 1.0")
        };
        assert_eq!(classify_leaf(&reciprocal), LicenseRisk::StrongCopyleft);
    }

    #[test]
    fn test_leaf_falls_back_to_discovered_text() {
        let info = LicenseInfo {
            discovered_as: Some("GNU Lesser General Public License v2.1 only".to_string()),
            code_sharing: "PERMISSIVE".to_string(),
            ..LicenseInfo::named("Vendor-renamed LGPL")
        };
        assert_eq!(classify_leaf(&info), LicenseRisk::WeakCopyleft);
    }

    #[test]
    fn test_spdx_id_wins_over_categories() {
        let info = LicenseInfo {
            spdx_id: Some("GPL-2.0".to_string()),
            code_sharing: "PERMISSIVE".to_string(),
            ..LicenseInfo::named("whatever")
        };
        assert_eq!(classify_leaf(&info), LicenseRisk::StrongCopyleft);
    }

    #[test]
    fn test_classify_strings() {
        assert_eq!(classify("MIT/Apache-2.0"), LicenseRisk::Permissive);
        assert_eq!(classify("MIT AND GPL-3.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify("GPL-2.0 WITH Classpath-exception-2.0"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify("commercial license"), LicenseRisk::Proprietary);
        assert_eq!(classify(""), LicenseRisk::Unknown);
    }
}
