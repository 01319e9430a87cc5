use std::{env, path::PathBuf};

use pipeline::artifact::{MODEL_NAME, ModelTag};

use crate::error::{Result, ServeErr};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STORE: &str = "./models";

/// Where to listen and which model to serve.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub store_root: PathBuf,
    pub tag: ModelTag,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT`, `MODEL_STORE` and `MODEL_TAG` from the environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(value) => {
                let parsed = value.trim().parse::<u16>();
                parsed.map_err(|e| ServeErr::InvalidConfig {
                    var: "PORT",
                    reason: e.to_string(),
                    value,
                })?
            }
        };

        let store_root = lookup("MODEL_STORE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));

        let tag = match lookup("MODEL_TAG") {
            None => ModelTag::latest(MODEL_NAME)?,
            Some(value) => {
                let parsed = value.trim().parse::<ModelTag>();
                parsed.map_err(|e| ServeErr::InvalidConfig {
                    var: "MODEL_TAG",
                    reason: e.to_string(),
                    value,
                })?
            }
        };

        Ok(Self {
            host,
            port,
            store_root,
            tag,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pipeline::artifact::Version;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]).unwrap();
        assert_eq!(c.addr(), "127.0.0.1:3000");
        assert_eq!(c.store_root, PathBuf::from("./models"));
        assert_eq!(c.tag.to_string(), "energy_consumption_model:latest");
    }

    #[test]
    fn reads_overrides() {
        let c = config(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("MODEL_STORE", "/srv/models"),
            ("MODEL_TAG", "energy_consumption_model:abc"),
        ])
        .unwrap();
        assert_eq!(c.addr(), "0.0.0.0:8080");
        assert_eq!(c.store_root, PathBuf::from("/srv/models"));
        assert_eq!(c.tag.version, Version::Pinned("abc".to_string()));
    }

    #[test]
    fn rejects_bad_values() {
        let err = config(&[("PORT", "99999")]).unwrap_err();
        assert!(matches!(err, ServeErr::InvalidConfig { var: "PORT", .. }));
        let err = config(&[("MODEL_TAG", "bad/tag")]).unwrap_err();
        assert!(matches!(err, ServeErr::InvalidConfig { var: "MODEL_TAG", .. }));
    }
}
