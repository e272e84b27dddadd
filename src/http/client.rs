use crate::http::error::TransportError;
use crate::http::transport::{Credentials, Transport};
use log::{debug, error, warn};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde_json::Value;
use std::time::Duration;

const ACCEPT_VALUE: &str = "*/*";
const USER_AGENT_VALUE: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/95.0.4638.69 Safari/537.36";

/// What to do when the API host cannot be reached at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionFailurePolicy {
    /// Return [`TransportError::Connection`] like any other failure.
    #[default]
    Recoverable,
    /// Log the failure and terminate the process with exit code 1.
    Abort,
}

/// Blocking reqwest-backed [`Transport`].
///
/// Every request carries a fixed `Accept` / `User-Agent` pair and, when given,
/// basic-auth credentials. Non-2xx replies are errors. Nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    policy: ConnectionFailurePolicy,
}

impl HttpClient {
    /// `timeout` of `None` keeps reqwest's default (30 s for the blocking client).
    pub fn new(
        timeout: Option<Duration>,
        policy: ConnectionFailurePolicy,
    ) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::ClientBuild)?;
        Ok(Self { client, policy })
    }

    pub fn policy(&self) -> ConnectionFailurePolicy {
        self.policy
    }

    fn send(&self, url: &str, auth: Option<&Credentials>) -> Result<Value, reqwest::Error> {
        let mut request = self.client.get(url);
        if let Some(credentials) = auth {
            request = request.basic_auth(credentials.username(), Some(credentials.password()));
        }
        request.send()?.error_for_status()?.json::<Value>()
    }

    fn classify(url: &str, e: reqwest::Error) -> TransportError {
        let url = url.to_string();
        if e.is_timeout() {
            TransportError::Timeout { url }
        } else if e.is_connect() {
            TransportError::Connection {
                url,
                source: Box::new(e),
            }
        } else if e.is_redirect() {
            TransportError::Redirect { url }
        } else if let Some(status) = e.status() {
            TransportError::Status { url, status }
        } else {
            TransportError::Other {
                url,
                source: Box::new(e),
            }
        }
    }
}

impl Transport for HttpClient {
    fn get(&self, url: &str, auth: Option<&Credentials>) -> Result<Value, TransportError> {
        debug!("Start online transaction: GET {}", url);
        let result = self.send(url, auth).map_err(|e| Self::classify(url, e));
        match &result {
            Ok(_) => debug!("End online transaction: GET {}", url),
            Err(TransportError::Connection { source, .. })
                if self.policy == ConnectionFailurePolicy::Abort =>
            {
                error!("Error connecting to {}: {}. Aborting.", url, source);
                std::process::exit(1);
            }
            Err(TransportError::Status { status, .. })
                if *status == reqwest::StatusCode::UNAUTHORIZED
                    || *status == reqwest::StatusCode::FORBIDDEN =>
            {
                warn!("Unauthorised access to {} ({})", url, status)
            }
            Err(e) => warn!("{}", e),
        }
        result
    }
}
