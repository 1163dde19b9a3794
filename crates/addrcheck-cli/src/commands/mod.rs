use addrcheck_config::AppConfig;
use addrcheck_remote::{OpenCageGeocoder, UspsClient, UspsSettings};
use anyhow::{Context as _, Result};
use serde::Serialize;
use std::io::{self, Write};

pub mod check;
pub mod completions;
pub mod validate;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Remote collaborators for one run, built from configuration before any
/// input is touched so missing secrets fail fast.
pub struct Services {
    pub usps: UspsClient,
    pub geocoder: Option<OpenCageGeocoder>,
}

pub fn build_services(config: &AppConfig, geocode: bool) -> Result<Services> {
    let credentials = config.validation_credentials()?;
    let geocoder = if geocode {
        let api_key = config.geocoding_api_key()?;
        Some(
            OpenCageGeocoder::new(
                &config.geocoding.url,
                api_key.expose().to_string(),
                &config.user_agent,
            )
            .with_context(|| "configure geocoding client")?,
        )
    } else {
        None
    };

    let usps = UspsClient::new(UspsSettings {
        token_url: config.validation.token_url.clone(),
        address_url: config.validation.address_url.clone(),
        client_id: credentials.client_id.expose().to_string(),
        client_secret: credentials.client_secret.expose().to_string(),
        user_agent: config.user_agent.clone(),
    })
    .with_context(|| "configure validation client")?;

    Ok(Services { usps, geocoder })
}

impl Services {
    pub fn geocoder(&self) -> Option<&dyn addrcheck_core::Geocoder> {
        self.geocoder
            .as_ref()
            .map(|geocoder| geocoder as &dyn addrcheck_core::Geocoder)
    }
}
