use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// How per-domain deploy failures affect the outcome of a run.
///
/// The upload step is always fatal on failure. This only governs what
/// happens after a certificate id has been obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployPolicy {
    /// The run succeeds once the upload succeeds; failed domains are reported only.
    #[default]
    BestEffort,
    /// Every domain is still attempted, but any failure fails the run.
    Strict,
}

impl DeployPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployPolicy::BestEffort => "best-effort",
            DeployPolicy::Strict => "strict",
        }
    }

    /// Whether a run with `failed` deploy failures should be reported as failed.
    pub fn fails_run(&self, failed: usize) -> bool {
        matches!(self, DeployPolicy::Strict) && failed > 0
    }
}

impl fmt::Display for DeployPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "best-effort" | "besteffort" => Ok(DeployPolicy::BestEffort),
            "strict" => Ok(DeployPolicy::Strict),
            other => Err(format!(
                "unknown deploy policy '{other}' (expected 'best-effort' or 'strict')"
            )),
        }
    }
}

// Accepts the same spellings as `FromStr`, so `Strict` from an Actions input works.
impl<'de> Deserialize<'de> for DeployPolicy {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(de)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
