use crate::types::DetectorConfig;
use anyhow::Result;
use std::fs;

impl DetectorConfig {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: DetectorConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }
}
