//! Sign-in, sign-out and the current user.

use bakery_core::User;
use reqwest::Method;

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::types::LoginResponse;

impl ApiClient {
    /// Exchanges credentials for a bearer token and stores it in the session.
    ///
    /// The backend expects an OAuth2 password form (`username`/`password`).
    ///
    /// # Errors
    ///
    /// - [`ClientError::Unauthorized`] for wrong credentials; the message is
    ///   the backend's own.
    /// - [`ClientError::Http`], [`ClientError::Api`],
    ///   [`ClientError::Deserialize`] on other failures.
    /// - [`ClientError::Session`] if the token cannot be persisted.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<LoginResponse, ClientError> {
        let url = self.endpoint("api/auth/login")?;
        let builder = self
            .request(Method::POST, url)
            .form(&[("username", identifier), ("password", secret)]);
        let login: LoginResponse = self.send_json(builder, "login").await?;
        self.session().set_token(&login.access_token)?;
        tracing::info!(user = %identifier, "signed in");
        Ok(login)
    }

    /// Forgets the stored token. Requests made afterwards are anonymous.
    pub fn logout(&self) {
        self.session().clear();
        tracing::info!("signed out");
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// # Errors
    ///
    /// - [`ClientError::NotAuthenticated`] when no token is stored.
    /// - [`ClientError::Unauthorized`] when the backend rejects the token;
    ///   the session is cleared.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.require_token()?;
        let url = self.endpoint("api/auth/me")?;
        self.send_json(self.request(Method::GET, url), "current_user")
            .await
    }
}
