//! HTTP client for the bakery REST API.
//!
//! Wraps `reqwest` with the backend's error conventions, bearer-token
//! injection from the shared [`Session`], and typed response
//! deserialization. Endpoint methods live in [`crate::products`],
//! [`crate::categories`] and [`crate::auth`].

use std::sync::Arc;
use std::time::Duration;

use bakery_core::{AppConfig, Category, ImageUpload, Product};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::{extract_backend_message, ClientError};
use crate::session::Session;
use crate::urls::absolute_image_url;

/// Client for the bakery REST API.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections. Use [`ApiClient::from_config`] in binaries and
/// [`ApiClient::new`] to point at a mock server in tests.
#[derive(Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session: Arc<Session>,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so that `Url::join` appends to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        Ok(Self {
            http,
            base_url: parsed,
            session,
        })
    }

    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &AppConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            session,
        )
    }

    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// The base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a relative image path against the API origin.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        absolute_image_url(self.base_url.as_str(), path)
    }

    pub(crate) fn absolutize_product(&self, mut product: Product) -> Product {
        for image in &mut product.images {
            *image = self.image_url(image);
        }
        product
    }

    pub(crate) fn absolutize_category(&self, mut category: Category) -> Category {
        for image in &mut category.images {
            *image = self.image_url(image);
        }
        category
    }

    /// `path` is relative to the base URL, e.g. `"api/products"`.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })
    }

    /// Appends `id` as a single percent-encoded path segment.
    pub(crate) fn endpoint_with_id(
        &self,
        path: &str,
        id: &str,
        entity: &'static str,
    ) -> Result<Url, ClientError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ClientError::MissingIdentifier { entity });
        }
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// Starts a request, attaching the bearer token if one is stored.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Fails fast with [`ClientError::NotAuthenticated`] when signed out.
    pub(crate) fn require_token(&self) -> Result<(), ClientError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(ClientError::NotAuthenticated)
        }
    }

    /// Sends a request and maps non-2xx statuses to typed errors.
    ///
    /// 401 and 403 clear the session before the error is returned.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let request = builder.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await?;
        let status = response.status();
        tracing::debug!(%method, %path, status = status.as_u16(), "bakery api response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_backend_message(&body);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                let had_token = self.session.is_authenticated();
                self.session.clear();
                if had_token {
                    tracing::warn!(%method, %path, status = status.as_u16(), "session rejected by backend; signed out");
                }
                Err(ClientError::Unauthorized {
                    status: status.as_u16(),
                    message,
                })
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound { path, message }),
            _ => Err(ClientError::Api {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// Sends a request and parses the body as `T`.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        context: &str,
    ) -> Result<T, ClientError> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

/// Builds a multipart body from text fields plus an optional `image` part.
pub(crate) fn multipart_form(
    fields: Vec<(&'static str, String)>,
    image: Option<ImageUpload>,
) -> Result<Form, ClientError> {
    let mut form = Form::new();
    for (name, value) in fields {
        form = form.text(name, value);
    }
    if let Some(image) = image {
        let file_name = image.file_name().to_string();
        let mime = image.mime().to_string();
        let part = Part::bytes(image.into_bytes())
            .file_name(file_name)
            .mime_str(&mime)?;
        form = form.part("image", part);
    }
    Ok(form)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
