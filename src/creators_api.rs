use crate::config::Config;
use crate::http_client;
use isahc::prelude::*;
use isahc::HttpClient;
use isahc::Request;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const API_VERSION: &str = "0.31";

#[derive(Debug)]
pub struct ApiError {
    pub msg: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureDetails {
    pub title: String,
    pub file_code: String,
    #[serde(default)]
    pub authors: Vec<FeatureAuthor>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSummary {
    pub title: String,
    pub file_code: String,
}

/// Client for the Creators syndication REST API. Every request carries
/// the `X_API_KEY` and `X_API_VERSION` headers.
#[derive(Debug, Clone)]
pub struct CreatorsApi {
    base_url: String,
    api_key: String,
    http_client: HttpClient,
}

impl CreatorsApi {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(Config::creators_base_url(), api_key)
    }

    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        CreatorsApi {
            base_url,
            api_key,
            http_client: http_client::client().clone(),
        }
    }

    pub fn feature_details(&self, file_code: &str) -> Result<FeatureDetails, ApiError> {
        self.get_json(&format!("/features/details/json/{file_code}"))
    }

    pub fn feature_list(&self) -> Result<Vec<FeatureSummary>, ApiError> {
        self.get_json("/features/get_list/json/NULL/1000")
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = Request::get(format!("{}/api{path}", self.base_url))
            .header("X_API_KEY", self.api_key.as_str())
            .header("X_API_VERSION", API_VERSION)
            .body(())
            .map_err(|err| ApiError {
                msg: format!("invalid request: {err:?}"),
            })?;

        let mut response = self.http_client.send(request).map_err(|err| ApiError {
            msg: format!("api request failed: {err:?}"),
        })?;

        if !response.status().is_success() {
            let msg = format!("api returned {} for {path}", response.status());

            return Err(ApiError { msg });
        }

        let text = response.text().map_err(|err| ApiError {
            msg: format!("failed to read api response: {err:?}"),
        })?;

        serde_json::from_str(&text).map_err(|err| ApiError {
            msg: format!("malformed api response for {path}: {err:?}"),
        })
    }
}
