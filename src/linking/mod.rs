/*! Entity linking.

Links the entities mentioned in a text through the Dandelion Entity Extraction API
(<https://dandelion.eu/docs/api/datatxt/nex/v1/>).

Credentials are read from the environment:

- `NEX_TOKEN` for token-based authentication,
- or `NEX_ID` and `NEX_KEY` for (older) app id/key pair authentication.

`NEX_URL` overrides the default endpoint.
!*/
use std::collections::HashMap;
use std::sync::Mutex;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEFAULT_NEX_URL: &str = "https://api.dandelion.eu/datatxt/nex/v1";

/// Dandelion API credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    AppKey { id: String, key: String },
}

impl Credentials {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Get credentials using `var` to look variables up.
    ///
    /// The token wins over the id/key pair.
    pub fn from_vars<F>(var: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| var(name).filter(|v| !v.is_empty());

        if let Some(token) = var("NEX_TOKEN") {
            debug!("Token-based authentication");
            return Ok(Credentials::Token(token));
        }

        match (var("NEX_ID"), var("NEX_KEY")) {
            (Some(id), Some(key)) => {
                debug!("App ID/key pair authentication");
                Ok(Credentials::AppKey { id, key })
            }
            _ => Err(Error::Credentials(
                "One or more Dandelion API credentials are not defined. Set either NEX_TOKEN, or NEX_ID and NEX_KEY".to_string(),
            )),
        }
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Credentials::Token(token) => vec![("token", token.clone())],
            Credentials::AppKey { id, key } => {
                vec![("$app_id", id.clone()), ("$app_key", key.clone())]
            }
        }
    }
}

/// An entity linked in a text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedEntity {
    /// Surface form.
    pub chunk: Option<String>,
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub uri: Option<String>,
    pub confidence: Option<f64>,
    pub types: Option<Vec<String>>,
    pub alternate_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct Annotation {
    spot: Option<String>,
    start: Option<u64>,
    end: Option<u64>,
    uri: Option<String>,
    confidence: Option<f64>,
    types: Option<Vec<String>>,
    #[serde(rename = "alternateLabels")]
    alternate_labels: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct NexResponse {
    annotations: Vec<Annotation>,
}

impl From<Annotation> for LinkedEntity {
    fn from(a: Annotation) -> Self {
        Self {
            chunk: a.spot,
            start: a.start,
            end: a.end,
            uri: a.uri,
            confidence: a.confidence,
            types: a.types,
            alternate_names: a.alternate_labels,
        }
    }
}

/// Extract the linked entities from a Dandelion response body.
pub fn extract_entities(response: &str) -> Result<Vec<LinkedEntity>, Error> {
    let response: NexResponse = serde_json::from_str(response)?;

    Ok(response
        .annotations
        .into_iter()
        .map(|a| {
            let entity = LinkedEntity::from(a);
            debug!("Linked entity: {:?}", entity);
            entity
        })
        .collect())
}

/// Blocking Dandelion client.
///
/// Responses are memoised by text for the lifetime of the client.
pub struct NexClient {
    client: reqwest::blocking::Client,
    url: String,
    credentials: Credentials,
    language: String,
    min_confidence: f64,
    memo: Mutex<HashMap<String, Vec<LinkedEntity>>>,
}

impl NexClient {
    pub fn new(
        url: &str,
        credentials: Credentials,
        language: &str,
        min_confidence: f64,
    ) -> Result<Self, Error> {
        Ok(Self {
            client: reqwest::blocking::Client::builder().build()?,
            url: url.to_string(),
            credentials,
            language: language.to_string(),
            min_confidence,
            memo: Mutex::new(HashMap::new()),
        })
    }

    /// Client configured from the environment.
    pub fn from_env(language: &str, min_confidence: f64) -> Result<Self, Error> {
        let credentials = Credentials::from_env()?;
        let url = std::env::var("NEX_URL").unwrap_or_else(|_| DEFAULT_NEX_URL.to_string());
        Self::new(&url, credentials, language, min_confidence)
    }

    fn memoised(&self, text: &str) -> Option<Vec<LinkedEntity>> {
        self.memo
            .lock()
            .ok()
            .and_then(|memo| memo.get(text).cloned())
    }

    /// Run entity linking on `text`.
    pub fn link(&self, text: &str) -> Result<Vec<LinkedEntity>, Error> {
        if let Some(entities) = self.memoised(text) {
            debug!("memoised response for '{}'", text);
            return Ok(entities);
        }

        debug!("Will run entity linking on: '{}'", text);
        let mut form = vec![
            ("text", text.to_string()),
            ("include", "types,alternate_labels".to_string()),
            ("min_confidence", self.min_confidence.to_string()),
            ("lang", self.language.clone()),
        ];
        form.extend(self.credentials.form_fields());

        let body = self
            .client
            .post(&self.url)
            .form(&form)
            .send()?
            .error_for_status()?
            .text()?;
        debug!("Response: {}", body);

        let entities = extract_entities(&body)?;
        if let Ok(mut memo) = self.memo.lock() {
            memo.insert(text.to_string(), entities.clone());
        }
        Ok(entities)
    }
}
