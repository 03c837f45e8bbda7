use crate::error::{Result, VehicleError};
use crate::logging::StructuredLogger;
use crate::tronity::auth::{Token, TokenSource};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

const APP_USER_AGENT: &str = concat!("tronity-vehicle/", env!("APP_VERSION"));

/// Build the plain HTTP client shared by token requests and API calls
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(APP_USER_AGENT)
        .build()?)
}

/// HTTP client that authenticates every request.
///
/// A 401 answer triggers one token refresh and one retry of the same
/// request; a failed refresh is returned as is.
#[derive(Clone)]
pub struct AuthenticatedClient {
    http: reqwest::Client,
    source: Arc<TokenSource>,
    logger: StructuredLogger,
}

impl AuthenticatedClient {
    pub fn new(http: reqwest::Client, source: TokenSource, logger: StructuredLogger) -> Self {
        Self {
            http,
            source: Arc::new(source),
            logger,
        }
    }

    pub fn token_source(&self) -> &TokenSource {
        &self.source
    }

    /// Send an authenticated request and fail on non-2xx status
    pub async fn send(&self, method: Method, url: &str) -> Result<Response> {
        let token = self.source.token().await?;
        let resp = self.execute(&method, url, &token).await?;

        let resp = if resp.status() == StatusCode::UNAUTHORIZED {
            self.logger.debug(&format!("{} {} unauthorized, refreshing token", method, url));
            let token = self.source.refresh_rejected(&token).await?;
            self.execute(&method, url, &token).await?
        } else {
            resp
        };

        check_status(resp)
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.send(Method::GET, url).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// POST with an empty body
    pub async fn post_empty(&self, url: &str) -> Result<()> {
        self.send(Method::POST, url).await?;
        Ok(())
    }

    async fn execute(&self, method: &Method, url: &str, token: &Token) -> Result<Response> {
        let mut request = self
            .http
            .request(method.clone(), url)
            .header(AUTHORIZATION, token.authorization())
            .header(ACCEPT, "application/json");
        if *method == Method::POST {
            request = request.body("");
        }

        let resp = request.send().await.inspect_err(|e| {
            self.logger.warn(&format!("{} {} failed: {}", method, url, e));
        })?;
        self.logger.trace(&format!("{} {} -> {}", method, url, resp.status()));
        Ok(resp)
    }
}

fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(VehicleError::http(
            status.as_u16(),
            format!("unexpected status: {}", status),
        ))
    }
}
