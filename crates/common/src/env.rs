use anyhow::{anyhow, Result};

pub trait EnvVars: Sized {
    fn load() -> Result<Self>;
    fn get_env_var(&self, key: &str) -> Option<String>;
}

pub fn required_env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| anyhow!("{} is not set", key))
}

/// Unset and empty values are both treated as absent.
pub fn optional_env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
