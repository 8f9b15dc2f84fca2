use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use nef_qod::config::normalize_endpoint;
use nef_qod::{PolicyCatalog, QodConfig, RegistryConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[arg(long, env = "NEF_QOD_ADDR", default_value = "0.0.0.0:8000")]
    pub listen_addr: String,

    /// Registry (NRF) base URL; tokens come from `{nrf_url}/oauth2/token`.
    #[arg(long, env = "NEF_NRF_URL", default_value = "http://127.0.0.1:8000")]
    pub nrf_url: String,

    #[arg(
        long,
        env = "NEF_CONSUMER_NF_INSTANCE_ID",
        default_value = "c49c146d-65d8-4c00-b627-73ccf62ecd47"
    )]
    pub consumer_nf_instance_id: String,

    #[arg(long, env = "NEF_TARGET_NF_SERVICE", default_value = "npcf-policyauthorization")]
    pub target_nf_service: String,

    /// Policy-control application-session endpoint. Unset or empty disables forwarding.
    #[arg(long, env = "PCF_QOD_URL")]
    pub pcf_qod_url: Option<String>,

    #[arg(
        long,
        env = "NEF_QOD_NOTIFICATION_URI",
        default_value = "http://127.0.0.1:8000/qod/v1/notifications"
    )]
    pub notification_uri: String,

    /// JSON policy catalog: `{"default": {...}, "profiles": {"<qosProfile>": {...}}}`.
    #[arg(long, env = "NEF_QOD_POLICY_FILE")]
    pub policy_file: Option<PathBuf>,

    /// `text` or `json`.
    #[arg(long, env = "NEF_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// OTLP endpoint for exporting traces.
    #[arg(long, env = "XTRACE_URL")]
    pub xtrace_url: Option<String>,

    /// Bearer token for the OTLP endpoint.
    #[arg(long, env = "XTRACE_TOKEN")]
    pub xtrace_token: Option<String>,
}

impl Args {
    pub fn qod_config(&self) -> anyhow::Result<QodConfig> {
        let catalog = match self.policy_file.as_deref() {
            Some(path) => PolicyCatalog::load(path).context("loading policy catalog")?,
            None => PolicyCatalog::default(),
        };

        Ok(QodConfig {
            registry: RegistryConfig {
                base_url: self.nrf_url.clone(),
                consumer_id: self.consumer_nf_instance_id.clone(),
                target_service: self.target_nf_service.clone(),
            },
            policy_control_url: normalize_endpoint(self.pcf_qod_url.clone()),
            notification_uri: self.notification_uri.clone(),
            catalog,
        })
    }
}
