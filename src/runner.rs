use std::collections::HashMap;
use std::time::Duration;

use indicatif::ProgressBar;
use regex::Regex;
use reqwest::Url;
use thiserror::Error;
use tokio::time::Instant;

use crate::api::{self, ApiError, RecommendationsResponse};
use crate::catalog::{CatalogState, RecommendationView};
use crate::probe;
use crate::resolver::{self, ResolutionStats};

#[derive(Clone, Debug)]
pub struct Options {
    pub base_url: String,
    pub email: Option<String>,
    pub password: Option<String>,
    pub rate: u32,
    pub timeout_seconds: usize,
    pub proxy: Option<String>,
    pub follow_redirects: bool,
    pub probe_images: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            email: None,
            password: None,
            rate: 50,
            timeout_seconds: 10,
            proxy: None,
            follow_redirects: false,
            probe_images: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no base URL provided")]
    MissingBaseUrl,

    #[error("email and password must be provided together")]
    IncompleteCredentials,

    #[error("invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything one load produced: the catalog state plus how the
/// enrichment and photo probing went.
#[derive(Clone, Debug)]
pub struct LoadReport {
    pub base: Url,
    pub state: CatalogState,
    pub stats: ResolutionStats,
    pub images: HashMap<String, bool>,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        if options.base_url.trim().is_empty() {
            return Err(RunnerError::MissingBaseUrl);
        }
        match (options.email.as_deref(), options.password.as_deref()) {
            (Some(email), Some(_)) => {
                if !email_looks_valid(email) {
                    return Err(RunnerError::InvalidEmail {
                        email: email.to_string(),
                    });
                }
            }
            (None, None) => {}
            _ => return Err(RunnerError::IncompleteCredentials),
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Runs the whole load pipeline: client, optional login, base fetch,
    /// concurrent type enrichment, optional photo probing. The returned
    /// view is ready only once every per-item resolution has settled.
    pub async fn run(&self, pb: &ProgressBar) -> Result<LoadReport, RunnerError> {
        let started_at = Instant::now();

        let base = api::parse_base_url(&self.options.base_url)?;
        let client = api::build_client(
            self.options.proxy.as_deref(),
            self.options.timeout_seconds,
            self.options.follow_redirects,
        )?;

        if let (Some(email), Some(password)) = (
            self.options.email.as_deref(),
            self.options.password.as_deref(),
        ) {
            api::login(&client, &base, email, password).await?;
        }

        let response = api::fetch_recommendations(&client, &base).await?;
        let records = match response {
            RecommendationsResponse::Unauthenticated { .. } => {
                return Ok(LoadReport {
                    base,
                    state: CatalogState::Unauthenticated,
                    stats: ResolutionStats::default(),
                    images: HashMap::new(),
                    elapsed: started_at.elapsed(),
                });
            }
            RecommendationsResponse::List(records) if records.is_empty() => {
                return Ok(LoadReport {
                    base,
                    state: CatalogState::Empty,
                    stats: ResolutionStats::default(),
                    images: HashMap::new(),
                    elapsed: started_at.elapsed(),
                });
            }
            RecommendationsResponse::List(records) => records,
        };

        let passes = if self.options.probe_images { 2 } else { 1 };
        pb.set_length((records.len() * passes) as u64);

        let models: Vec<String> = records.iter().map(|r| r.model.clone()).collect();
        let (items, stats) =
            resolver::enrich_recommendations(&client, &base, pb, records, self.options.rate).await;

        let images = if self.options.probe_images {
            probe::probe_images(&client, &base, pb, &models, self.options.rate).await
        } else {
            HashMap::new()
        };

        Ok(LoadReport {
            base,
            state: CatalogState::Ready(RecommendationView::new(items)),
            stats,
            images,
            elapsed: started_at.elapsed(),
        })
    }
}

fn email_looks_valid(email: &str) -> bool {
    match Regex::new(r"^[\w.+-]+@[\w-]+(\.[\w-]+)+$") {
        Ok(re) => re.is_match(email.trim()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_requires_a_base_url() {
        assert!(matches!(
            Runner::new(Options::default()),
            Err(RunnerError::MissingBaseUrl)
        ));
    }

    #[test]
    fn runner_rejects_half_a_credential_pair() {
        let options = Options {
            base_url: "http://localhost:5000/".to_string(),
            email: Some("user@example.com".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            Runner::new(options),
            Err(RunnerError::IncompleteCredentials)
        ));
    }

    #[test]
    fn email_shape_check() {
        assert!(email_looks_valid("user@example.com"));
        assert!(email_looks_valid("first.last+tag@mail.co.uk"));
        assert!(!email_looks_valid("not-an-email"));
        assert!(!email_looks_valid("user@host"));
    }
}
