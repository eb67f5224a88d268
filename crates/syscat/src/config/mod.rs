//! Connection configuration document and variable substitution.

mod types;
mod vars;

pub use types::*;
pub use vars::{
    replace_variables, VariableResolver, VAR_DATABASE, VAR_HOST, VAR_PASSWORD, VAR_PORT,
    VAR_PROJECT_NAME, VAR_PROJECT_PATH, VAR_SERVER, VAR_URL, VAR_USER,
};

use std::path::Path;

use crate::error::Result;

impl ConnectionConfiguration {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration to a JSON file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
