use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use reqwest::Url;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum StartPage {
    #[default]
    Home,
    Global,
    Local,
    Metrics,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Base URL of the analysis backend.
    #[arg(long, default_value = DEFAULT_SERVER)]
    server: String,

    /// Page shown at startup.
    #[arg(long, value_enum, default_value_t = StartPage::Home)]
    page: StartPage,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server: Url,
    pub page: StartPage,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self> {
        let server = Url::parse(args.server.trim())
            .with_context(|| format!("invalid backend URL {:?}", args.server))?;
        if !matches!(server.scheme(), "http" | "https") {
            bail!("backend URL must use http or https, got {}", server.scheme());
        }
        if server.host_str().is_none() {
            bail!("backend URL {server} has no host");
        }

        Ok(Self {
            server,
            page: args.page,
        })
    }
}
