use crate::http::error::TransportError;
use serde_json::Value;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// HTTP basic-auth credentials for the VCSN API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Issues a GET and returns the parsed JSON body.
///
/// [`crate::http::client::HttpClient`] is the network implementation; tests and
/// offline callers can supply their own.
pub trait Transport {
    fn get(&self, url: &str, auth: Option<&Credentials>) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn get(&self, url: &str, auth: Option<&Credentials>) -> Result<Value, TransportError> {
        (**self).get(url, auth)
    }
}
