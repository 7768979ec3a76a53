use anyhow::{anyhow, Result};
use sns_common::{optional_env_var, required_env_var, EnvVars};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_REQUEST_LIMIT_BYTES: usize = 50 * 1024 * 1024;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_APP_ID: &str = "sns";

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional_env_var(key) {
        Some(value) => value.trim().parse()
            .map_err(|e| anyhow!("{} must be a number, got '{}': {}", key, value, e)),
        None => Ok(default),
    }
}

#[derive(Debug, Clone)]
pub struct ApiServerEnv {
    pub port: u16,
    /// Allowed CORS origins; `None` allows any origin.
    pub client_root_url: Option<String>,
    pub request_limit_bytes: usize,
    pub request_timeout_secs: u64,
    pub app_id: String,
}

impl ApiServerEnv {
    pub fn allowed_origins(&self) -> Vec<String> {
        self.client_root_url.as_deref()
            .map(|urls| urls.split(',').map(|u| u.trim().to_string()).filter(|u| !u.is_empty()).collect())
            .unwrap_or_default()
    }
}

impl EnvVars for ApiServerEnv {
    fn load() -> Result<Self> {
        Ok(Self {
            port: parse_or("PORT", DEFAULT_PORT)?,
            client_root_url: optional_env_var("CLIENT_ROOT_URL"),
            request_limit_bytes: parse_or("REQUEST_LIMIT_BYTES", DEFAULT_REQUEST_LIMIT_BYTES)?,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?,
            app_id: optional_env_var("APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.to_string()),
        })
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        match key {
            "PORT" => Some(self.port.to_string()),
            "CLIENT_ROOT_URL" => self.client_root_url.clone(),
            "REQUEST_LIMIT_BYTES" => Some(self.request_limit_bytes.to_string()),
            "REQUEST_TIMEOUT_SECS" => Some(self.request_timeout_secs.to_string()),
            "APP_ID" => Some(self.app_id.clone()),
            _ => None,
        }
    }
}

/// Settings of the identity provider whose ID tokens the API accepts.
#[derive(Debug, Clone)]
pub struct IdentityEnv {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    /// Inline JWKS document; fetched from the issuer when absent.
    pub jwks: Option<String>,
}

impl IdentityEnv {
    pub fn issuer(&self) -> String {
        format!("https://cognito-idp.{}.amazonaws.com/{}", self.region, self.user_pool_id)
    }

    pub fn jwks_url(&self) -> String {
        format!("{}/.well-known/jwks.json", self.issuer())
    }
}

impl EnvVars for IdentityEnv {
    fn load() -> Result<Self> {
        Ok(Self {
            region: required_env_var("AWS_REGION")?,
            user_pool_id: required_env_var("COGNITO_USER_POOL_ID")?,
            client_id: required_env_var("COGNITO_CLIENT_ID")?,
            jwks: optional_env_var("COGNITO_JWKS"),
        })
    }

    fn get_env_var(&self, key: &str) -> Option<String> {
        match key {
            "AWS_REGION" => Some(self.region.clone()),
            "COGNITO_USER_POOL_ID" => Some(self.user_pool_id.clone()),
            "COGNITO_CLIENT_ID" => Some(self.client_id.clone()),
            "COGNITO_JWKS" => self.jwks.clone(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issuer_and_jwks_url() {
        let env = IdentityEnv {
            region: "ap-northeast-1".to_string(),
            user_pool_id: "ap-northeast-1_abc".to_string(),
            client_id: "client".to_string(),
            jwks: None,
        };
        assert_eq!(env.issuer(), "https://cognito-idp.ap-northeast-1.amazonaws.com/ap-northeast-1_abc");
        assert_eq!(env.jwks_url(), "https://cognito-idp.ap-northeast-1.amazonaws.com/ap-northeast-1_abc/.well-known/jwks.json");
        assert_eq!(env.get_env_var("COGNITO_CLIENT_ID").as_deref(), Some("client"));
    }

    #[test]
    fn test_allowed_origins_split() {
        let env = ApiServerEnv {
            port: DEFAULT_PORT,
            client_root_url: Some("http://localhost:3000, https://sns.example.com".to_string()),
            request_limit_bytes: DEFAULT_REQUEST_LIMIT_BYTES,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            app_id: DEFAULT_APP_ID.to_string(),
        };
        assert_eq!(env.allowed_origins(), vec!["http://localhost:3000", "https://sns.example.com"]);
    }

    #[test]
    fn test_bad_number_is_reported() {
        std::env::set_var("SNS_API_TEST_PORT", "five");
        let err = parse_or::<u16>("SNS_API_TEST_PORT", DEFAULT_PORT).unwrap_err();
        assert!(err.to_string().contains("SNS_API_TEST_PORT"));
    }
}
