use std::time::Duration;

use reqwest::{redirect, Proxy, Url};
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::ShoeType;

const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:95.0) Gecko/20100101 Firefox/95.0";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid base URL: {url}")]
    InvalidBaseUrl { url: String },

    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request failed: {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("login rejected: {message}")]
    LoginRejected { message: String },
}

pub fn parse_base_url(value: &str) -> Result<Url, ApiError> {
    Url::parse(value.trim()).map_err(|_| ApiError::InvalidBaseUrl {
        url: value.to_string(),
    })
}

/// Builds the one client used for the whole run. Cookies stay enabled so
/// the login session carries over to every later request.
pub fn build_client(
    proxy: Option<&str>,
    timeout_seconds: usize,
    follow_redirects: bool,
) -> Result<reqwest::Client, ApiError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_static(USER_AGENT),
    );

    let redirect_policy = if follow_redirects {
        redirect::Policy::limited(10)
    } else {
        redirect::Policy::none()
    };

    let timeout = Duration::from_secs(timeout_seconds.try_into().unwrap_or(10));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .redirect(redirect_policy)
        .timeout(timeout)
        .cookie_store(true);

    if let Some(proxy) = proxy.filter(|p| !p.trim().is_empty()) {
        let proxy = Proxy::all(proxy).map_err(|e| ApiError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy);
    }

    builder
        .build()
        .map_err(|e| ApiError::ClientBuild { source: e })
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct BestSize {
    pub eu: f32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub model: String,
    pub compatibility: u8,
    pub best_size: BestSize,
}

/// The recommendations endpoint answers with either a plain array or an
/// error object when no session is present.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RecommendationsResponse {
    Unauthenticated { error: String },
    List(Vec<RecommendationRecord>),
}

pub async fn fetch_recommendations(
    client: &reqwest::Client,
    base: &Url,
) -> Result<RecommendationsResponse, ApiError> {
    let url = endpoint(base, "get_recommendations");
    let body = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ApiError::Request {
            url: url.to_string(),
            source: e,
        })?
        .text()
        .await
        .map_err(|e| ApiError::Request {
            url: url.to_string(),
            source: e,
        })?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        source: e,
    })
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    success: bool,
    message: Option<String>,
}

/// Submits the login form. The service replies 200 either way and flags
/// the outcome in the body.
pub async fn login(
    client: &reqwest::Client,
    base: &Url,
    email: &str,
    password: &str,
) -> Result<(), ApiError> {
    let url = endpoint(base, "login");
    let reply: LoginReply = client
        .post(url.clone())
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .map_err(|e| ApiError::Request {
            url: url.to_string(),
            source: e,
        })?
        .json()
        .await
        .map_err(|e| ApiError::Request {
            url: url.to_string(),
            source: e,
        })?;
    if reply.success {
        Ok(())
    } else {
        Err(ApiError::LoginRejected {
            message: reply
                .message
                .unwrap_or_else(|| "no reason given".to_string()),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ShoeTypeReply {
    #[serde(rename = "shoeType")]
    shoe_type: String,
}

/// Asks the service for one model's category. Any failure along the way
/// answers None; the caller falls back to the heuristic.
pub async fn fetch_shoe_type(
    client: &reqwest::Client,
    base: &Url,
    model: &str,
) -> Option<ShoeType> {
    let mut url = endpoint(base, "get_shoe_type");
    url.query_pairs_mut().append_pair("model", model);
    let resp = client.get(url).send().await.ok()?;
    if !resp.status().is_success() {
        return None;
    }
    let reply: ShoeTypeReply = resp.json().await.ok()?;
    ShoeType::parse(&reply.shoe_type)
}

/// Catalog photos live under a static path keyed by model name and a
/// 1-based photo index.
pub fn image_url(base: &Url, model: &str, index: usize) -> Url {
    let mut url = base.clone();
    let file = format!("{index}.jpg");
    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .pop_if_empty()
            .extend(["static", "models photo", model, file.as_str()]);
    }
    url
}

/// Path of the shoe-detail page a gallery card links to.
pub fn detail_path(base: &Url, model: &str) -> String {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["shoe", model]);
    }
    url.path().to_string()
}

fn endpoint(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(path);
    }
    url
}
