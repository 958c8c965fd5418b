//! WordPress REST publishing.
//!
//! Every route is tried first through the `?rest_route=` query form, which
//! some firewalls leave open when `/wp-json/` is blocked, and then through
//! the pretty `/wp-json/` path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::{AutowriterError, Result};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    /// Scheduled; requires `date_gmt`.
    Future,
    Publish,
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "future" | "scheduled" => Ok(Self::Future),
            "publish" => Ok(Self::Publish),
            _ => Err(format!("Invalid status: {}. Valid options: draft, future, publish", s)),
        }
    }
}

/// Body of a create-post request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub status: PostStatus,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<u64>>,
    /// UTC, `YYYY-MM-DDTHH:MM:SS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_gmt: Option<String>,
}

impl PostPayload {
    /// The request body as pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Fields of a created post reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedPost {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    #[serde(default = "unnamed_category")]
    pub name: String,
}

fn unnamed_category() -> String {
    "(no name)".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WpUser {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

impl Category {
    /// Categories from a static name to id map, sorted by name.
    pub fn from_map(map: &BTreeMap<String, u64>) -> Vec<Category> {
        map.iter().map(|(name, id)| Category { id: *id, name: name.clone() }).collect()
    }
}

/// Ids of the categories named in `names`, in the order given.
pub fn select_categories(available: &[Category], names: &[String]) -> Result<Vec<u64>> {
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|c| c.name == *name)
                .map(|c| c.id)
                .ok_or_else(|| AutowriterError::ConfigError(format!("unknown category: {}", name)))
        })
        .collect()
}

/// Formats a timestamp as the UTC `date_gmt` field.
pub fn format_date_gmt(at: OffsetDateTime) -> Result<String> {
    at.to_offset(UtcOffset::UTC)
        .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"))
        .map_err(|e| AutowriterError::Serialization(e.to_string()))
}

/// Parses an RFC 3339 schedule such as `2026-11-01T09:00:00+09:00`.
pub fn parse_schedule(text: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(text.trim(), &Rfc3339)
        .map_err(|e| AutowriterError::ConfigError(format!("invalid schedule '{}': {}", text, e)))
}

/// REST URLs to try for `route`, in order.
pub fn route_candidates(base: &str, route: &str) -> Vec<String> {
    let base = if base.ends_with('/') { base.to_string() } else { format!("{}/", base) };
    let route = route.trim_start_matches('/');
    let query_form = match route.split_once('?') {
        Some((path, query)) => format!("{}?rest_route=/{}&{}", base, path, query),
        None => format!("{}?rest_route=/{}", base, route),
    };
    vec![query_form, format!("{}wp-json/{}", base, route)]
}

#[cfg(feature = "http")]
pub use client::WordPressClient;

#[cfg(feature = "http")]
mod client {
    use std::time::Duration;

    use reqwest::{Client, Method, RequestBuilder, Response};
    use url::Url;

    use super::{Category, PostPayload, PublishedPost, WpUser, route_candidates};
    use crate::error::truncate_body;
    use crate::settings::SiteSettings;
    use crate::{AutowriterError, Result};

    const READ_TIMEOUT: u64 = 20;
    const WRITE_TIMEOUT: u64 = 45;
    const ERROR_BODY_CHARS: usize = 1000;

    /// REST client for one WordPress site, authenticated with an
    /// application password.
    pub struct WordPressClient {
        base: String,
        user: String,
        password: String,
        client: Client,
    }

    impl WordPressClient {
        pub fn new(url: &str, user: &str, password: &str) -> Result<Self> {
            let parsed = Url::parse(url).map_err(|e| AutowriterError::InvalidUrl(format!("{}: {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AutowriterError::InvalidUrl(format!("{}: scheme must be http or https", url)));
            }

            let base = if url.ends_with('/') { url.to_string() } else { format!("{}/", url) };
            let client = Client::builder().build().map_err(AutowriterError::HttpError)?;
            Ok(Self { base, user: user.to_string(), password: password.to_string(), client })
        }

        pub fn from_site(site: &SiteSettings) -> Result<Self> {
            Self::new(&site.url, &site.user, &site.password)
        }

        pub fn base_url(&self) -> &str {
            &self.base
        }

        /// The authenticated user; fails when the credentials are rejected.
        pub async fn current_user(&self) -> Result<WpUser> {
            let response = self.send(Method::GET, "wp/v2/users/me", None).await?;
            Ok(response.json().await?)
        }

        /// Site categories sorted by name.
        ///
        /// Failures are logged and yield an empty list.
        pub async fn categories(&self) -> Vec<Category> {
            let result = async {
                let response = self.send(Method::GET, "wp/v2/categories?per_page=100&_fields=id,name", None).await?;
                Ok::<Vec<Category>, AutowriterError>(response.json().await?)
            }
            .await;

            match result {
                Ok(mut categories) => {
                    categories.sort_by(|a, b| a.name.cmp(&b.name));
                    categories
                }
                Err(e) => {
                    tracing::warn!(site = %self.base, error = %e, "could not fetch categories");
                    Vec::new()
                }
            }
        }

        /// Creates a post.
        pub async fn publish(&self, payload: &PostPayload) -> Result<PublishedPost> {
            let body = serde_json::to_value(payload)?;
            let response = self.send(Method::POST, "wp/v2/posts", Some(&body)).await?;
            let post: PublishedPost = response.json().await?;
            tracing::info!(id = post.id, status = %post.status, link = %post.link, "post created");
            Ok(post)
        }

        fn request(&self, method: Method, url: &str, body: Option<&serde_json::Value>, timeout: u64) -> RequestBuilder {
            let builder = self
                .client
                .request(method, url)
                .basic_auth(&self.user, Some(&self.password))
                .header("Accept", "application/json")
                .timeout(Duration::from_secs(timeout));
            match body {
                Some(body) => builder.json(body),
                None => builder,
            }
        }

        /// Tries each route form in turn; the first success wins, otherwise
        /// the last failure is returned.
        async fn send(&self, method: Method, route: &str, body: Option<&serde_json::Value>) -> Result<Response> {
            let timeout = if method == Method::GET { READ_TIMEOUT } else { WRITE_TIMEOUT };
            let mut last_error = None;

            for url in route_candidates(&self.base, route) {
                tracing::debug!(%method, %url, "WordPress request");

                match self.request(method.clone(), &url, body, timeout).send().await {
                    Ok(response) if response.status().is_success() => return Ok(response),
                    Ok(response) => {
                        let status = response.status().as_u16();
                        let text = response.text().await.unwrap_or_default();
                        last_error = Some(AutowriterError::Publish { status, body: truncate_body(&text, ERROR_BODY_CHARS) });
                    }
                    Err(e) if e.is_timeout() => last_error = Some(AutowriterError::Timeout { timeout }),
                    Err(e) => last_error = Some(AutowriterError::HttpError(e)),
                }
            }

            Err(last_error.unwrap_or_else(|| AutowriterError::InvalidUrl(self.base.clone())))
        }
    }

}
