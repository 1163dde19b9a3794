use crate::{RemoteError, Result};
use reqwest::blocking::{Client, Response};
use url::Url;

/// Requests run with the transport's default timeouts.
pub fn build_client(user_agent: &str) -> Result<Client> {
    Ok(Client::builder().user_agent(user_agent).build()?)
}

pub fn parse_endpoint(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RemoteError::Parse(format!(
            "endpoint must use http or https: {url}"
        )));
    }
    Ok(url)
}

/// Status code and body text, whatever the status.
pub fn read_response(response: Response) -> Result<(u16, String)> {
    let status = response.status().as_u16();
    let body = response.text()?;
    Ok((status, body))
}
