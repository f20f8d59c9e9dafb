use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::{Genesis, Principal};

/// File form of a ballot's genesis parameters.
///
/// ```toml
/// administrator = "owner"
/// voters = ["alice", "bob"]
///
/// [journal]
/// enabled = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotConfig {
    pub administrator: String,

    #[serde(default)]
    pub voters: Vec<String>,

    #[serde(default)]
    pub journal: JournalConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Retain emitted events inside the ballot
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

impl BallotConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading ballot config {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BallotConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate and convert into genesis parameters.
    pub fn into_genesis(self) -> Result<Genesis> {
        if self.administrator.trim().is_empty() {
            bail!("administrator must not be empty");
        }

        let mut seen = BTreeSet::new();
        for voter in &self.voters {
            if voter.trim().is_empty() {
                bail!("voter identities must not be empty");
            }
            if !seen.insert(voter.as_str()) {
                bail!("voter {voter} is listed more than once");
            }
        }

        let mut genesis = Genesis::new(Principal::new(self.administrator))
            .with_voters(self.voters.into_iter().map(Principal::from));
        genesis.keep_journal = self.journal.enabled;
        Ok(genesis)
    }
}
