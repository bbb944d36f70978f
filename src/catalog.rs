use crate::domain::models::{Cafe, NewCafe};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("catalog service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog service returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("unexpected catalog response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogError::Transport(_) => "CATALOG_UNREACHABLE",
            CatalogError::Status { .. } => "CATALOG_STATUS",
            CatalogError::Decode(_) => "CATALOG_DECODE",
        }
    }
}

/// The four operations of the remote catalog service.
pub trait CatalogApi {
    fn fetch_all(&self) -> Result<Vec<Cafe>, CatalogError>;
    fn search(&self, location: &str) -> Result<Vec<Cafe>, CatalogError>;
    fn random(&self) -> Result<Cafe, CatalogError>;
    fn add(&self, cafe: &NewCafe) -> Result<AddOutcome, CatalogError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddOutcome {
    #[serde(default)]
    pub success: String,
    #[serde(default)]
    pub cafe: Option<Cafe>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CafeList {
    Wrapped { cafes: Vec<Cafe> },
    Bare(Vec<Cafe>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneCafe {
    Wrapped { cafe: Cafe },
    Bare(Cafe),
}

pub fn decode_list(body: &str) -> Result<Vec<Cafe>, CatalogError> {
    Ok(match serde_json::from_str::<CafeList>(body) {
        Ok(CafeList::Wrapped { cafes }) | Ok(CafeList::Bare(cafes)) => cafes,
        // Untagged errors say nothing useful; re-run the canonical shape for the message.
        Err(_) => {
            #[derive(Deserialize)]
            struct Canonical {
                cafes: Vec<Cafe>,
            }
            serde_json::from_str::<Canonical>(body)?.cafes
        }
    })
}

pub fn decode_one(body: &str) -> Result<Cafe, CatalogError> {
    Ok(match serde_json::from_str::<OneCafe>(body) {
        Ok(OneCafe::Wrapped { cafe }) | Ok(OneCafe::Bare(cafe)) => cafe,
        Err(_) => {
            #[derive(Deserialize)]
            struct Canonical {
                cafe: Cafe,
            }
            serde_json::from_str::<Canonical>(body)?.cafe
        }
    })
}

pub fn decode_add(body: &str) -> Result<AddOutcome, CatalogError> {
    Ok(serde_json::from_str(body)?)
}

/// Best human-readable description of a failed response.
pub fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
        match v.get("detail") {
            Some(serde_json::Value::String(s)) => return s.clone(),
            Some(other) => return other.to_string(),
            None => {}
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

fn read_body(resp: Response) -> Result<String, CatalogError> {
    let status = resp.status();
    let body = resp.text()?;
    if !status.is_success() {
        return Err(CatalogError::Status {
            status: status.as_u16(),
            detail: error_detail(status, &body),
        });
    }
    Ok(body)
}

#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CatalogError> {
        debug!(path, ?query, "catalog request");
        let resp = self.client.get(self.url(path)).query(query).send()?;
        read_body(resp)
    }
}

impl CatalogApi for HttpCatalog {
    fn fetch_all(&self) -> Result<Vec<Cafe>, CatalogError> {
        decode_list(&self.get("/all", &[])?)
    }

    fn search(&self, location: &str) -> Result<Vec<Cafe>, CatalogError> {
        match self.get("/search", &[("loc", location)]) {
            Ok(body) => decode_list(&body),
            // The service answers "nothing at that location" with a 404.
            Err(CatalogError::Status { status: 404, detail }) => {
                debug!(location, %detail, "search returned no cafes");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn random(&self) -> Result<Cafe, CatalogError> {
        decode_one(&self.get("/random", &[])?)
    }

    fn add(&self, cafe: &NewCafe) -> Result<AddOutcome, CatalogError> {
        debug!(name = %cafe.name, "catalog add");
        let resp = self.client.post(self.url("/add")).json(cafe).send()?;
        decode_add(&read_body(resp)?)
    }
}
