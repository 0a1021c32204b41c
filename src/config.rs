use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::license::definition::{LicenseInfo, LicenseKind, LicenseNode};
use crate::license::render::{reduce, Operand, Reducer};
use crate::license::spdx::normalize;
use crate::models::PolicyVerdict;

/// Policy key consulted for components whose license displays as `UNKNOWN`.
pub const UNKNOWN_KEY: &str = "unknown";

/// Root configuration structure, deserialized from `.license-display/config.toml`.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// License policy rules.
    pub policy: PolicyConfig,
}

/// Defines how licenses are evaluated.
#[derive(Debug, Deserialize)]
pub struct PolicyConfig {
    /// Verdict applied to any license not explicitly listed in `licenses`.
    /// Defaults to `warn`.
    #[serde(default = "default_policy_action")]
    pub default: PolicyAction,
    /// Per-license overrides keyed by SPDX identifier or knowledge-base name
    /// (e.g. `"MIT"`, `"GPL-3.0"`, `"Apache License 2.0"`).
    #[serde(default)]
    pub licenses: HashMap<String, PolicyAction>,
}

fn default_policy_action() -> PolicyAction {
    PolicyAction::Warn
}

/// The action to take when a license matches a policy rule.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PolicyAction {
    Pass,
    Warn,
    /// The CLI exits with code 1.
    Error,
}

impl PolicyAction {
    pub fn to_verdict(self) -> PolicyVerdict {
        match self {
            PolicyAction::Pass => PolicyVerdict::Pass,
            PolicyAction::Warn => PolicyVerdict::Warn,
            PolicyAction::Error => PolicyVerdict::Error,
        }
    }
}

impl Default for Config {
    /// Built-in policy used when no config file is found.
    ///
    /// Permissive licenses pass, weak-copyleft licenses and unresolved
    /// licenses warn, and strong-copyleft licenses (GPL, AGPL) produce an error.
    fn default() -> Self {
        let mut licenses = HashMap::new();
        for id in ["MIT", "Apache-2.0", "BSD-2-Clause", "BSD-3-Clause", "ISC"] {
            licenses.insert(id.to_string(), PolicyAction::Pass);
        }
        for id in ["LGPL-2.1", "LGPL-3.0", "MPL-2.0", UNKNOWN_KEY] {
            licenses.insert(id.to_string(), PolicyAction::Warn);
        }
        for id in ["GPL-2.0", "GPL-3.0", "AGPL-3.0"] {
            licenses.insert(id.to_string(), PolicyAction::Error);
        }

        Config {
            policy: PolicyConfig {
                default: PolicyAction::Warn,
                licenses,
            },
        }
    }
}

/// Load the policy configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.license-display/config.toml`
/// 3. `~/.config/license-display/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".license-display").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-display")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    debug!("no policy file found, using built-in policy");
    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    info!(path = %path.display(), "loading policy");
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Invalid policy file {}", path.display()))
}

/// Look up a single license key in the policy, falling back to the default action.
pub fn apply_policy(config: &Config, license: &str) -> PolicyVerdict {
    lookup(config, license).unwrap_or_else(|| config.policy.default.to_verdict())
}

fn lookup(config: &Config, key: &str) -> Option<PolicyVerdict> {
    config.policy.licenses.get(key).map(|action| action.to_verdict())
}

/// Determine the policy verdict for a whole license tree.
///
/// `OR` groups take the most permissive verdict of their operands, `AND`
/// groups the most restrictive. Unresolved licenses are pruned as in the
/// display string; a tree that displays as `UNKNOWN` gets the verdict for
/// [`UNKNOWN_KEY`].
pub fn evaluate_policy(config: &Config, node: &LicenseNode) -> PolicyVerdict {
    match reduce(node, &PolicyReducer { config }) {
        Ok(Operand::Resolved(verdict)) => verdict,
        _ => apply_policy(config, UNKNOWN_KEY),
    }
}

struct PolicyReducer<'a> {
    config: &'a Config,
}

impl Reducer for PolicyReducer<'_> {
    type Output = PolicyVerdict;

    /// SPDX id, then display name, then the name's SPDX equivalent.
    fn leaf(&self, info: &LicenseInfo) -> PolicyVerdict {
        info.spdx_id
            .as_deref()
            .and_then(|id| lookup(self.config, id))
            .or_else(|| lookup(self.config, &info.name))
            .or_else(|| lookup(self.config, &normalize(&info.name)))
            .unwrap_or_else(|| self.config.policy.default.to_verdict())
    }

    fn combine(&self, kind: LicenseKind, operands: Vec<PolicyVerdict>) -> PolicyVerdict {
        let fold = match kind {
            LicenseKind::Disjunctive => verdict_or,
            LicenseKind::Conjunctive => verdict_and,
        };
        operands
            .into_iter()
            .reduce(fold)
            .unwrap_or_else(|| self.config.policy.default.to_verdict())
    }
}

/// Most permissive (least severe) of two verdicts — used for OR semantics.
/// Pass < Warn < Error
fn verdict_or(a: PolicyVerdict, b: PolicyVerdict) -> PolicyVerdict {
    match (a, b) {
        (PolicyVerdict::Pass, _) | (_, PolicyVerdict::Pass) => PolicyVerdict::Pass,
        (PolicyVerdict::Warn, _) | (_, PolicyVerdict::Warn) => PolicyVerdict::Warn,
        _ => PolicyVerdict::Error,
    }
}

/// Most restrictive (most severe) of two verdicts — used for AND semantics.
/// Error > Warn > Pass
fn verdict_and(a: PolicyVerdict, b: PolicyVerdict) -> PolicyVerdict {
    match (a, b) {
        (PolicyVerdict::Error, _) | (_, PolicyVerdict::Error) => PolicyVerdict::Error,
        (PolicyVerdict::Warn, _) | (_, PolicyVerdict::Warn) => PolicyVerdict::Warn,
        _ => PolicyVerdict::Pass,
    }
}
