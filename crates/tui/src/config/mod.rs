use chrono_tz::Tz;
use clap::Parser;
use engine::Currency;
use reqwest::Url;
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/finboard.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub list_path: String,
    pub create_path: String,
    pub currency: String,
    pub timezone: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            list_path: "/expenses/".to_string(),
            create_path: "/entries/".to_string(),
            currency: "USD".to_string(),
            timezone: "UTC".to_string(),
            log_file: "finboard.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Currency used to display amounts.
    pub fn currency(&self) -> Result<Currency> {
        Currency::try_from(self.currency.as_str())
            .map_err(|err| config::ConfigError::Message(err.to_string()).into())
    }

    /// Timezone used for "today" and refresh times.
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            config::ConfigError::Message(format!("unknown timezone: {}", self.timezone)).into()
        })
    }

    /// Where entries are listed from.
    pub fn list_url(&self) -> Result<Url> {
        endpoint(&self.base_url, &self.list_path)
    }

    /// Where new entries are posted to.
    pub fn create_url(&self) -> Result<Url> {
        endpoint(&self.base_url, &self.create_path)
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<Url> {
    let url = format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&url).map_err(|err| {
        config::ConfigError::Message(format!("invalid base_url {base_url:?}: {err}")).into()
    })
}

#[derive(Debug, Parser)]
#[command(name = "finboard", disable_version_flag = true)]
pub struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:8000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override the path entries are listed from.
    #[arg(long)]
    list_path: Option<String>,
    /// Override the path new entries are posted to.
    #[arg(long)]
    create_path: Option<String>,
    /// Display currency (USD, EUR, BRL).
    #[arg(long)]
    currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Log file path; the terminal is owned by the UI.
    #[arg(long)]
    log_file: Option<String>,
    /// Log level or filter directive (e.g. debug, finboard=trace).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_with(Args::parse())
}

fn load_with(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("FINBOARD"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(list_path) = args.list_path {
        settings.list_path = list_path;
    }
    if let Some(create_path) = args.create_path {
        settings.create_path = create_path;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = log_file;
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    settings.currency()?;
    settings.timezone()?;
    settings.list_url()?;
    settings.create_url()?;
    Ok(settings)
}
