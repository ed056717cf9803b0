use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::{
    hints::{HintRule, HintRules, DEFAULT_HINT_RULES},
    storage::{self, StorageManager},
};

const CONFIG_KEY: &str = "config.yaml";

const DEFAULT_SERVER_ADDR: &str = "http://127.0.0.1:8000";
/// How many recommended formats are listed.
const DEFAULT_RECOMMENDED_LIMIT: usize = 4;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the extraction server. `AOI_ADDR` takes precedence.
    #[serde(default = "default_server_addr")]
    pub server_addr: String,

    /// Client-side request timeout. None waits indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default = "default_recommended_limit")]
    pub recommended_limit: usize,

    /// Patterns matched against error messages to suggest a fix.
    #[serde(default = "default_hints")]
    pub hints: Vec<HintRule>,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: default_server_addr(),
            request_timeout_secs: None,
            recommended_limit: default_recommended_limit(),
            hints: default_hints(),
            base_path: PathBuf::new(),
        }
    }
}

fn default_server_addr() -> String {
    DEFAULT_SERVER_ADDR.to_string()
}

fn default_recommended_limit() -> usize {
    DEFAULT_RECOMMENDED_LIMIT
}

fn default_hints() -> Vec<HintRule> {
    DEFAULT_HINT_RULES.clone()
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        if url::Url::parse(&self.server_addr).is_err() {
            bail!("server_addr must be an absolute url, got {:?}", self.server_addr);
        }

        if self.request_timeout_secs == Some(0) {
            bail!("request_timeout_secs must be greater than 0");
        }

        for (idx, rule) in self.hints.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                bail!("hint #{} has an empty pattern", idx + 1);
            }
        }
        HintRules::compile(&self.hints).context("invalid hint pattern")?;

        Ok(())
    }

    pub fn load_with(base_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path.as_ref())?;

        // create new if does not exist
        if !store.exists(CONFIG_KEY) {
            store.write(CONFIG_KEY, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_KEY)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.as_ref().to_path_buf();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_KEY, config_str.as_bytes())?;
        Ok(())
    }

    pub fn hint_rules(&self) -> HintRules {
        HintRules::compile(&self.hints).unwrap_or_else(|err| {
            log::warn!("invalid hint rules, hints disabled: {err}");
            HintRules::empty()
        })
    }
}
