use serde::Deserialize;
use std::env;

pub const ENV_PREFIX: &str = "FLEETGATE_AGENT";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub listen_host: String,
    pub listen_port: u16,
    /// Shared secret issued by the controller at registration.
    pub secret: String,
    /// Comma-separated caller addresses allowed to hit the webhook.
    /// Empty means the origin check is skipped.
    pub allowed_origins: String,
    /// Where the committed local status lives.
    pub state_path: String,
    /// Optional custom maintenance page template.
    pub maintenance_template: Option<String>,
}

// (ENV_NAME, config_key)
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("FLEETGATE_AGENT_LISTEN_HOST", "listen_host"),
    ("FLEETGATE_AGENT_LISTEN_PORT", "listen_port"),
    ("FLEETGATE_AGENT_SECRET", "secret"),
    ("FLEETGATE_AGENT_ALLOWED_ORIGINS", "allowed_origins"),
    ("FLEETGATE_AGENT_STATE_PATH", "state_path"),
    ("FLEETGATE_AGENT_MAINTENANCE_TEMPLATE", "maintenance_template"),
];

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.secret.trim().is_empty() {
            anyhow::bail!("secret cannot be empty; set FLEETGATE_AGENT_SECRET");
        }
        if self.state_path.trim().is_empty() {
            anyhow::bail!("state_path cannot be empty");
        }
        Ok(())
    }

    /// Parsed origin allow-list: comma-separated, trimmed, empties dropped.
    pub fn allowed_origin_list(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }
}

pub fn load() -> anyhow::Result<AppConfig> {
    let mut builder = config::Config::builder()
        .add_source(config::File::with_name("config").required(false))
        .set_default("listen_host", "0.0.0.0")?
        .set_default("listen_port", 8081)?
        .set_default("secret", "")?
        .set_default("allowed_origins", "")?
        .set_default("state_path", "data/site-state.json")?
        .set_default("maintenance_template", Option::<String>::None)?;

    // Override with single-underscore environment variables.
    for (env_key, cfg_key) in ENV_OVERRIDES {
        if let Ok(value) = env::var(env_key) {
            builder = builder.set_override(*cfg_key, value)?;
        }
    }

    let cfg = builder.build()?;
    let mut app: AppConfig = cfg.try_deserialize()?;
    app.secret = app.secret.trim().to_string();
    app.validate()?;
    Ok(app)
}
