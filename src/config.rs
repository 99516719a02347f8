use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Service configuration, read from the environment or from JSON such as
/// `{"url": "...", "auth": {"type": "bearertoken", "bearer_token": "..."}, "timeout": "30s"}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub url: Option<String>,
    pub auth: Auth,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

#[derive(Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Auth {
    NoAuth,
    BearerToken { bearer_token: String },
    Basic { username: String, password: String },
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAuth => f.write_str("NoAuth"),
            Self::BearerToken { .. } => f.debug_struct("BearerToken").finish_non_exhaustive(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
        }
    }
}

impl Auth {
    pub fn authenticator(&self) -> Result<Arc<dyn crate::Authenticator>, crate::Error> {
        let authenticator: Arc<dyn crate::Authenticator> = match self {
            Self::NoAuth => Arc::new(crate::auth::NoAuth),
            Self::BearerToken { bearer_token } => {
                Arc::new(crate::auth::BearerToken::new(bearer_token)?)
            }
            Self::Basic { username, password } => {
                Arc::new(crate::auth::Basic::new(username, password)?)
            }
        };
        Ok(authenticator)
    }
}

impl Config {
    /// Reads `<NAME>_URL`, `<NAME>_AUTH_TYPE`, `<NAME>_TIMEOUT` and the
    /// credential variables of the chosen authenticator, where `<NAME>` is
    /// `service_name` upper-cased with `-` replaced by `_`.
    pub fn from_env(service_name: &str) -> Result<Self, crate::Error> {
        Self::from_vars(service_name, env::vars())
    }

    pub fn from_vars<I>(service_name: &str, vars: I) -> Result<Self, crate::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let prefix = format!("{}_", service_name.to_uppercase().replace('-', "_"));
        let vars = vars
            .into_iter()
            .filter_map(|(key, value)| Some((key.strip_prefix(&prefix)?.to_owned(), value)))
            .filter(|(_, value)| !value.is_empty())
            .collect::<HashMap<_, _>>();
        let var = |name: &str| vars.get(name).cloned();
        let require = |name: &str| {
            var(name).ok_or_else(|| crate::Error::Config(format!("{prefix}{name} is not set")))
        };

        let auth_type = match var("AUTH_TYPE") {
            Some(auth_type) => auth_type.to_lowercase(),
            None if vars.contains_key("APIKEY") => "iam".to_owned(),
            None if vars.contains_key("BEARER_TOKEN") => "bearertoken".to_owned(),
            None => return Err(crate::Error::Config(format!("{prefix}AUTH_TYPE is not set"))),
        };
        let auth = match auth_type.as_str() {
            "noauth" => Auth::NoAuth,
            "bearertoken" => Auth::BearerToken {
                bearer_token: require("BEARER_TOKEN")?,
            },
            "basic" => Auth::Basic {
                username: require("USERNAME")?,
                password: require("PASSWORD")?,
            },
            "iam" | "container" | "cp4d" | "vpc" | "mcsp" => {
                return Err(crate::Error::Config(format!(
                    "authentication type {auth_type} needs token exchange, which is not supported"
                )));
            }
            _ => {
                return Err(crate::Error::Config(format!(
                    "unknown authentication type: {auth_type}"
                )));
            }
        };

        let timeout = var("TIMEOUT")
            .map(|timeout| humantime::parse_duration(&timeout))
            .transpose()
            .map_err(|e| crate::Error::Config(format!("{prefix}TIMEOUT: {e}")))?;

        Ok(Self {
            url: var("URL"),
            auth,
            timeout,
        })
    }
}
