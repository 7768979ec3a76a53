mod client;
mod env;
mod icon_key;

pub use client::ModuleClient;
pub use env::{EnvVars, optional_env_var, required_env_var};
pub use icon_key::icon_object_key;

#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    pub use async_trait;
    pub use tracing;
}
