use crate::models::LicenseRisk;

/// Classify a single canonical SPDX identifier into a risk level.
pub fn classify_spdx_id(id: &str) -> LicenseRisk {
    match id.trim() {
        // Permissive
        "MIT"
        | "MIT-0"
        | "Apache-1.1"
        | "Apache-2.0"
        | "BSD-2-Clause"
        | "BSD-3-Clause"
        | "BSD-4-Clause"
        | "ISC"
        | "0BSD"
        | "Unlicense"
        | "Zlib"
        | "CC0-1.0"
        | "CC-BY-3.0"
        | "CC-BY-4.0"
        | "PSF-2.0"
        | "Python-2.0"
        | "BSL-1.0"
        | "Artistic-2.0" => LicenseRisk::Permissive,

        // Weak copyleft
        "LGPL-2.0"
        | "LGPL-2.0-only"
        | "LGPL-2.0-or-later"
        | "LGPL-2.1"
        | "LGPL-2.1-only"
        | "LGPL-2.1-or-later"
        | "LGPL-3.0"
        | "LGPL-3.0-only"
        | "LGPL-3.0-or-later"
        | "MPL-1.1"
        | "MPL-2.0"
        | "CDDL-1.0"
        | "CDDL-1.1"
        | "EPL-1.0"
        | "EPL-2.0"
        | "EUPL-1.2" => LicenseRisk::WeakCopyleft,

        // Strong copyleft
        "GPL-2.0"
        | "GPL-2.0-only"
        | "GPL-2.0-or-later"
        | "GPL-3.0"
        | "GPL-3.0-only"
        | "GPL-3.0-or-later"
        | "AGPL-3.0"
        | "AGPL-3.0-only"
        | "AGPL-3.0-or-later"
        | "SSPL-1.0" => LicenseRisk::StrongCopyleft,

        _ => LicenseRisk::Unknown,
    }
}

/// Map a knowledge-base display name to its SPDX identifier when one is known.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed {
        "Apache License 2.0" | "Apache License, Version 2.0" | "Apache 2.0" => {
            "Apache-2.0".to_string()
        }
        "MIT License" | "The MIT License" => "MIT".to_string(),
        "BSD 2-clause \"Simplified\" License" | "BSD 2-Clause" | "Simplified BSD" => {
            "BSD-2-Clause".to_string()
        }
        "BSD 3-clause \"New\" or \"Revised\" License" | "BSD 3-Clause" | "New BSD" | "BSD" => {
            "BSD-3-Clause".to_string()
        }
        "GNU General Public License v2.0 only" | "GNU General Public License v2.0" | "GPLv2" => {
            "GPL-2.0".to_string()
        }
        "GNU General Public License v3.0 only" | "GNU General Public License v3.0" | "GPLv3" => {
            "GPL-3.0".to_string()
        }
        "GNU Lesser General Public License v2.1 only" | "LGPLv2.1" => "LGPL-2.1".to_string(),
        "GNU Lesser General Public License v3.0 only" | "LGPLv3" => "LGPL-3.0".to_string(),
        "GNU Affero General Public License v3.0" | "AGPLv3" => "AGPL-3.0".to_string(),
        "Mozilla Public License 2.0" | "MPL 2.0" => "MPL-2.0".to_string(),
        "Eclipse Public License 2.0" => "EPL-2.0".to_string(),
        "ISC License" => "ISC".to_string(),
        "CC0" | "Public Domain" => "CC0-1.0".to_string(),
        other => other.to_string(),
    }
}

/// Risk implied by a knowledge-base code-sharing category.
pub fn classify_code_sharing(code_sharing: &str) -> LicenseRisk {
    match code_sharing.trim() {
        "PERMISSIVE" => LicenseRisk::Permissive,
        "WEAK_RECIPROCAL" => LicenseRisk::WeakCopyleft,
        "RECIPROCAL" | "RECIPROCAL_AGPL" => LicenseRisk::StrongCopyleft,
        _ => LicenseRisk::Unknown,
    }
}

/// Risk implied by a knowledge-base ownership category.
pub fn classify_ownership(ownership: &str) -> LicenseRisk {
    match ownership.trim() {
        "PROPRIETARY" => LicenseRisk::Proprietary,
        _ => LicenseRisk::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_spdx_id() {
        assert_eq!(classify_spdx_id("MIT"), LicenseRisk::Permissive);
        assert_eq!(classify_spdx_id(" Apache-2.0 "), LicenseRisk::Permissive);
        assert_eq!(classify_spdx_id("MPL-2.0"), LicenseRisk::WeakCopyleft);
        assert_eq!(classify_spdx_id("AGPL-3.0-only"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify_spdx_id("Foo-1.0"), LicenseRisk::Unknown);
    }

    #[test]
    fn test_normalize_knowledge_base_names() {
        assert_eq!(normalize("Apache License 2.0"), "Apache-2.0");
        assert_eq!(normalize("MIT License"), "MIT");
        assert_eq!(normalize("BSD 3-clause \"New\" or \"Revised\" License"), "BSD-3-Clause");
        assert_eq!(normalize("Some Vendor EULA"), "Some Vendor EULA");
    }

    #[test]
    fn test_classify_categories() {
        assert_eq!(classify_code_sharing("PERMISSIVE"), LicenseRisk::Permissive);
        assert_eq!(classify_code_sharing("WEAK_RECIPROCAL"), LicenseRisk::WeakCopyleft);
        assert_eq!(classify_code_sharing("RECIPROCAL_AGPL"), LicenseRisk::StrongCopyleft);
        assert_eq!(classify_code_sharing(""), LicenseRisk::Unknown);
        assert_eq!(classify_ownership("PROPRIETARY"), LicenseRisk::Proprietary);
        assert_eq!(classify_ownership("OPEN_SOURCE"), LicenseRisk::Unknown);
    }
}
