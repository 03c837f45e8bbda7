//! OAuth2 token handling for the Tronity platform
//!
//! Two modes share one [`TokenSource`]:
//! - app flow: every refresh logs in again with the client credentials
//!   (`grant_type: "app"`), no refresh token is kept;
//! - user flow: a stored token pair is refreshed with the standard
//!   `refresh_token` grant.

use crate::config::{ClientCredentials, Tokens};
use crate::error::{Result, VehicleError};
use crate::logging::StructuredLogger;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

// Tokens this close to expiry are refreshed up front
const EXPIRY_DELTA_SECS: i64 = 10;

/// Bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
}

impl Token {
    /// Seed from a stored pair; expiry is unknown
    pub fn from_tokens(tokens: &Tokens) -> Self {
        Self {
            access_token: tokens.access.trim().to_string(),
            token_type: "Bearer".to_string(),
            refresh_token: Some(tokens.refresh.trim().to_string()),
            expiry: None,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry - TimeDelta::seconds(EXPIRY_DELTA_SECS) > now,
            None => true,
        }
    }

    /// Value for the Authorization header
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_token(self, previous_refresh: Option<String>) -> Token {
        Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: self
                .refresh_token
                .filter(|r| !r.is_empty())
                .or(previous_refresh),
            expiry: self
                .expires_in
                .filter(|secs| *secs > 0)
                .map(|secs| Utc::now() + TimeDelta::seconds(secs)),
        }
    }
}

#[derive(Serialize)]
struct AppLogin<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// How the token source obtains new tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    App,
    User,
}

/// Produces bearer tokens and refreshes them on demand
pub struct TokenSource {
    mode: TokenMode,
    credentials: ClientCredentials,
    token_url: String,
    http: reqwest::Client,
    current: Mutex<Option<Token>>,
    logger: StructuredLogger,
}

impl TokenSource {
    /// Select the mode from the configured tokens: a stored pair means user flow
    pub fn new(
        credentials: ClientCredentials,
        tokens: &Tokens,
        token_url: String,
        http: reqwest::Client,
        logger: StructuredLogger,
    ) -> Self {
        let (mode, current) = if tokens.is_present() {
            (TokenMode::User, Some(Token::from_tokens(tokens)))
        } else {
            (TokenMode::App, None)
        };
        Self {
            mode,
            credentials,
            token_url,
            http,
            current: Mutex::new(current),
            logger,
        }
    }

    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    /// Current token, refreshed first if missing or expired
    pub async fn token(&self) -> Result<Token> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref()
            && token.is_valid()
        {
            return Ok(token.clone());
        }
        self.refresh_locked(&mut current).await
    }

    /// Replace a token the provider rejected.
    ///
    /// If another caller already replaced `rejected`, its successor is
    /// returned without a second refresh.
    pub async fn refresh_rejected(&self, rejected: &Token) -> Result<Token> {
        let mut current = self.current.lock().await;
        if let Some(token) = current.as_ref()
            && token.access_token != rejected.access_token
            && token.is_valid()
        {
            return Ok(token.clone());
        }
        self.refresh_locked(&mut current).await
    }

    async fn refresh_locked(&self, current: &mut Option<Token>) -> Result<Token> {
        let token = match self.mode {
            TokenMode::App => self.app_login().await?,
            TokenMode::User => {
                let refresh = current
                    .as_ref()
                    .and_then(|t| t.refresh_token.clone())
                    .unwrap_or_default();
                self.exchange_refresh_token(refresh).await?
            }
        };
        *current = Some(token.clone());
        Ok(token)
    }

    async fn app_login(&self) -> Result<Token> {
        self.logger.debug("requesting app token");
        let body = AppLogin {
            client_id: &self.credentials.id,
            client_secret: &self.credentials.secret,
            grant_type: "app",
        };
        let request = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .json(&body);
        let res = self.request_token(request).await?;
        Ok(res.into_token(None))
    }

    async fn exchange_refresh_token(&self, refresh_token: String) -> Result<Token> {
        if refresh_token.is_empty() {
            return Err(VehicleError::auth("missing refresh token"));
        }
        self.logger.debug("refreshing user token");
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.credentials.id.as_str()),
            ("client_secret", self.credentials.secret.as_str()),
        ];
        let request = self
            .http
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&form[..]);
        let res = self.request_token(request).await?;
        Ok(res.into_token(Some(refresh_token)))
    }

    async fn request_token(&self, request: reqwest::RequestBuilder) -> Result<TokenResponse> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            self.logger.warn(&format!("token request rejected: {}", status));
            return Err(VehicleError::auth_rejected(
                status.as_u16(),
                format!("token request failed: {}", status),
            ));
        }
        let bytes = resp.bytes().await?;
        let res: TokenResponse = serde_json::from_slice(&bytes)?;
        if res.access_token.is_empty() {
            return Err(VehicleError::auth("token response without access token"));
        }
        Ok(res)
    }
}
