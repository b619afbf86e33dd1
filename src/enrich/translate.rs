use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::Translator;
use crate::error::ClientError;

const SERVICE: &str = "translation";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Response {
    response_data: Option<ResponseData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// MyMemory: `GET {url}?q=..&langpair=en|vi`.
pub struct MyMemory {
    client: Client,
    url: String,
    lang_pair: String,
}

impl MyMemory {
    pub fn new(url: &str, lang_pair: &str, timeout: Duration) -> Result<Self> {
        Ok(MyMemory {
            client: Client::builder().timeout(timeout).build()?,
            url: url.to_string(),
            lang_pair: lang_pair.to_string(),
        })
    }
}

impl Translator for MyMemory {
    fn translate(&self, text: &str) -> Result<String, ClientError> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[("q", text), ("langpair", self.lang_pair.as_str())])
            .send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Status { service: SERVICE, status });
        }
        parse_response(&resp.text()?)
    }
}

fn parse_response(body: &str) -> Result<String, ClientError> {
    let resp: Response =
        serde_json::from_str(body).map_err(|source| ClientError::Decode { service: SERVICE, source })?;
    resp.response_data
        .and_then(|d| d.translated_text)
        .ok_or(ClientError::Empty(SERVICE))
}
