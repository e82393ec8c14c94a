use serde::{Deserialize, Deserializer};

pub const ENV_PREFIX: &str = "FLEETGATE_CTRL";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub operator: OperatorAuthConfig,
    pub dispatch: DispatchConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorAuthConfig {
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub tokens: Vec<String>,
    pub header_name: String,
}

fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrVec {
        String(String),
        Vec(Vec<String>),
    }

    match StringOrVec::deserialize(deserializer)? {
        StringOrVec::String(value) => Ok(value.split(',').map(|s| s.to_string()).collect()),
        StringOrVec::Vec(values) => Ok(values),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Max seconds to wait for a site agent to answer a status push.
    #[serde(default = "default_dispatch_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_field_len: usize,
}

fn default_dispatch_timeout_secs() -> u64 {
    20
}

impl DispatchConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout_secs == 0 {
            anyhow::bail!("dispatch.timeout_secs must be > 0");
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_dispatch_timeout_secs(),
        }
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    let env = config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        // Keep try_parsing disabled so numeric token strings are not coerced.
        .try_parsing(false);

    let builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .add_source(env)
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite://data/controller.db")?
        .set_default("operator.tokens", vec!["dev-operator-token"])?
        .set_default("operator.header_name", "authorization")?
        .set_default("dispatch.timeout_secs", default_dispatch_timeout_secs())?
        .set_default("limits.max_field_len", 255)?;

    let cfg = builder.build()?;
    let app: AppConfig = cfg.try_deserialize()?;
    app.dispatch.validate()?;
    if app.limits.max_field_len == 0 {
        anyhow::bail!("limits.max_field_len must be > 0");
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, panic, sync::Mutex};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_controller_env(vars: &[(&str, &str)], test: impl FnOnce() + panic::UnwindSafe) {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        let prefix = format!("{}__", ENV_PREFIX);

        let existing: Vec<(String, String)> = env::vars()
            .filter(|(key, _)| key.starts_with(&prefix))
            .collect();

        for (key, _) in &existing {
            env::remove_var(key);
        }

        for (key, value) in vars {
            env::set_var(key, value);
        }

        let result = panic::catch_unwind(test);

        for (key, _) in vars {
            env::remove_var(key);
        }

        for (key, value) in existing {
            env::set_var(key, value);
        }

        result.unwrap();
    }

    #[test]
    fn numeric_tokens_remain_strings() {
        with_controller_env(&[("FLEETGATE_CTRL__OPERATOR__TOKENS", "1111,2222")], || {
            let cfg = load().expect("config loads");
            assert_eq!(
                cfg.operator.tokens,
                vec!["1111".to_string(), "2222".to_string()]
            );
        });
    }

    #[test]
    fn numeric_env_values_still_parse() {
        with_controller_env(
            &[
                ("FLEETGATE_CTRL__SERVER__PORT", "9090"),
                ("FLEETGATE_CTRL__DISPATCH__TIMEOUT_SECS", "5"),
            ],
            || {
                let cfg = load().expect("config loads");
                assert_eq!(cfg.server.port, 9090);
                assert_eq!(cfg.dispatch.timeout_secs, 5);
            },
        );
    }

    #[test]
    fn dispatch_timeout_defaults_to_twenty_seconds() {
        with_controller_env(&[], || {
            let cfg = load().expect("config loads");
            assert_eq!(cfg.dispatch.timeout_secs, 20);
        });
    }
}
