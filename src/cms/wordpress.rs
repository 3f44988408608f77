use super::{CmsError, ContentStore, NewPost, NewUser};
use crate::http_client;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use isahc::prelude::*;
use isahc::HttpClient;
use isahc::Request;
use serde::Serialize;

/// Talks to the WordPress REST API with an application password.
#[derive(Debug, Clone)]
pub struct WordpressStore {
    base_url: String,
    auth_header: String,
    http_client: HttpClient,
}

#[derive(Serialize)]
struct UserPayload<'a> {
    username: &'a str,
    password: &'a str,
    email: &'a str,
    url: &'a str,
    name: &'a str,
    roles: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    first_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

impl WordpressStore {
    pub fn new(base_url: String, username: &str, app_password: &str) -> Self {
        let credentials = STANDARD.encode(format!("{username}:{app_password}"));

        WordpressStore {
            base_url,
            auth_header: format!("Basic {credentials}"),
            http_client: http_client::client().clone(),
        }
    }

    fn insert(&self, path: &str, payload: &impl Serialize) -> Result<i64, CmsError> {
        let body = serde_json::to_vec(payload).map_err(|err| CmsError {
            msg: format!("failed to serialize {path} payload: {err:?}"),
        })?;

        let request = Request::post(format!("{}/wp-json/wp/v2/{path}", self.base_url))
            .header("Authorization", self.auth_header.as_str())
            .header("Content-Type", "application/json")
            .body(body)
            .map_err(|err| CmsError {
                msg: format!("invalid request: {err:?}"),
            })?;

        let mut response = self.http_client.send(request).map_err(|err| CmsError {
            msg: format!("wordpress request failed: {err:?}"),
        })?;

        let text = response.text().map_err(|err| CmsError {
            msg: format!("failed to read wordpress response: {err:?}"),
        })?;

        if !response.status().is_success() {
            let msg = format!("wordpress rejected {path}: {} {text}", response.status());

            return Err(CmsError { msg });
        }

        let value: serde_json::Value = serde_json::from_str(&text).map_err(|err| CmsError {
            msg: format!("malformed wordpress response: {err:?}"),
        })?;

        value["id"].as_i64().ok_or_else(|| CmsError {
            msg: format!("wordpress response has no id: {text}"),
        })
    }
}

impl ContentStore for WordpressStore {
    fn insert_post(&mut self, post: &NewPost) -> Result<i64, CmsError> {
        self.insert("posts", post)
    }

    fn insert_user(&mut self, user: &NewUser) -> Result<i64, CmsError> {
        let payload = UserPayload {
            username: &user.login,
            password: &user.password,
            email: &user.email,
            url: &user.url,
            name: &user.display_name,
            roles: [user.role.as_str()],
            first_name: user.first_name.as_deref(),
            last_name: user.last_name.as_deref(),
            description: user.description.as_deref(),
        };

        self.insert("users", &payload)
    }
}
