use crate::http::{build_client, parse_endpoint, read_response};
use crate::{RemoteError, Result};
use addrcheck_core::{
    AccessToken, AddressValidator, CoreError, StandardizedAddress, TokenProvider,
    ValidationRequest, ValidationVerdict,
};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

const GRANT_TYPE: &str = "client_credentials";

#[derive(Debug, Clone)]
pub struct UspsSettings {
    pub token_url: String,
    pub address_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// USPS Addresses v3: OAuth2 client-credentials token plus address lookup.
pub struct UspsClient {
    client: Client,
    token_url: Url,
    address_url: Url,
    client_id: String,
    client_secret: String,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct AddressResponse {
    address: AddressFields,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressFields {
    #[serde(default)]
    secondary_address: Option<String>,
    street_address: String,
    city: String,
    state: String,
    #[serde(rename = "ZIPCode")]
    zip_code: String,
}

impl From<AddressFields> for StandardizedAddress {
    fn from(fields: AddressFields) -> Self {
        Self {
            secondary_address: fields.secondary_address,
            street_address: fields.street_address,
            city: fields.city,
            state: fields.state,
            zip_code: fields.zip_code,
        }
    }
}

impl UspsClient {
    pub fn new(settings: UspsSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(&settings.user_agent)?,
            token_url: parse_endpoint(&settings.token_url)?,
            address_url: parse_endpoint(&settings.address_url)?,
            client_id: settings.client_id,
            client_secret: settings.client_secret,
        })
    }

    pub fn request_token(&self) -> Result<AccessToken> {
        debug!(url = %self.token_url, "requesting access token");
        let response = self
            .client
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .json(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: GRANT_TYPE,
            })
            .send()?;
        let (status, body) = read_response(response)?;
        interpret_token_response(status, &body)
    }

    fn lookup(&self, token: &AccessToken, request: &ValidationRequest) -> Result<(u16, String)> {
        let response = self
            .client
            .get(self.address_url.clone())
            .bearer_auth(token.as_str())
            .header(ACCEPT, "application/json")
            .query(&address_query(request))
            .send()?;
        read_response(response)
    }
}

impl TokenProvider for UspsClient {
    fn acquire_token(&self) -> std::result::Result<AccessToken, CoreError> {
        self.request_token().map_err(|err| match err {
            RemoteError::Core(core) => core,
            other => CoreError::Authentication(other.to_string()),
        })
    }
}

impl AddressValidator for UspsClient {
    fn normalize(&self, token: &AccessToken, request: &ValidationRequest) -> ValidationVerdict {
        match self.lookup(token, request) {
            Ok((status, body)) => {
                debug!(status, street = %request.street, "address lookup finished");
                interpret_address_response(status, &body, &request.original_full_address)
            }
            Err(err) => {
                warn!(error = %err, "address lookup failed");
                ValidationVerdict::invalid(err.to_string())
            }
        }
    }
}

/// ZIP is only sent when present; otherwise the service resolves it from
/// city and state.
pub fn address_query(request: &ValidationRequest) -> Vec<(&'static str, &str)> {
    let mut query = vec![
        ("streetAddress", request.street.as_str()),
        ("city", request.city.as_str()),
        ("state", request.state.as_str()),
    ];
    if let Some(zip5) = request.zip5.as_deref().map(str::trim) {
        if !zip5.is_empty() {
            query.push(("ZIPCode", zip5));
        }
    }
    query
}

pub fn interpret_token_response(status: u16, body: &str) -> Result<AccessToken> {
    if status != 200 {
        return Err(RemoteError::Status {
            status,
            body: body.trim().to_string(),
        });
    }
    let parsed: TokenResponse =
        serde_json::from_str(body).map_err(|err| RemoteError::Parse(err.to_string()))?;
    Ok(AccessToken::new(&parsed.access_token)?)
}

pub fn interpret_address_response(
    status: u16,
    body: &str,
    original_full_address: &str,
) -> ValidationVerdict {
    match status {
        200 => match serde_json::from_str::<AddressResponse>(body) {
            Ok(parsed) => {
                let address = StandardizedAddress::from(parsed.address);
                ValidationVerdict::from_standardized(&address, original_full_address)
            }
            Err(err) => ValidationVerdict::invalid(format!("parse error: {err}")),
        },
        404 => ValidationVerdict::not_found(),
        _ => {
            if body.trim().is_empty() {
                ValidationVerdict::invalid(format!("HTTP status {status}"))
            } else {
                ValidationVerdict::invalid(body)
            }
        }
    }
}
