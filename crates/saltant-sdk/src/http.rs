// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Authenticated HTTP session shared by every manager.

use std::io::Read;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Result, SdkError};

pub const HTTP_200_OK: u16 = 200;
pub const HTTP_201_CREATED: u16 = 201;
pub const HTTP_202_ACCEPTED: u16 = 202;

/// A response of any status, with its body read to text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// URL the request was sent to.
    pub url: String,
    /// Observed status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl RawResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            SdkError::Serialization(format!("invalid response body from {}: {}", self.url, e))
        })
    }
}

/// Base URL plus an authenticated connection pool.
///
/// `ureq::Agent` is a thread-safe handle, so a session can serve requests
/// from many threads at once. The timeout is fixed at construction.
#[derive(Clone)]
pub struct Session {
    agent: ureq::Agent,
    base_api_url: String,
    authorization: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_api_url", &self.base_api_url)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session sending `Authorization: Token <auth_token>`.
    pub fn new(base_api_url: &str, auth_token: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        let mut base_api_url = base_api_url.to_string();
        if !base_api_url.ends_with('/') {
            base_api_url.push('/');
        }

        Self {
            agent,
            base_api_url,
            authorization: format!("Token {}", auth_token),
        }
    }

    /// The base API URL, always ending in `/`.
    pub fn base_api_url(&self) -> &str {
        &self.base_api_url
    }

    /// Join a relative API path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_api_url, path.trim_start_matches('/'))
    }

    /// GET with the given query pairs.
    pub fn get(&self, path: &str, query: &[(String, String)]) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(method = "GET", url = %url, "Sending request");

        let mut request = self.request("GET", &url);
        for (key, value) in query {
            request = request.query(key, value);
        }
        Self::read(url, request.call())
    }

    /// POST a JSON body, or an empty body when `body` is `None`.
    pub fn post<B: Serialize + ?Sized>(&self, path: &str, body: Option<&B>) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(method = "POST", url = %url, "Sending request");

        let request = self.request("POST", &url);
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        Self::read(url, result)
    }

    /// PUT a JSON body.
    pub fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(method = "PUT", url = %url, "Sending request");
        Self::read(url.clone(), self.request("PUT", &url).send_json(body))
    }

    /// PATCH a JSON body.
    pub fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<RawResponse> {
        let url = self.url(path);
        debug!(method = "PATCH", url = %url, "Sending request");
        Self::read(url.clone(), self.request("PATCH", &url).send_json(body))
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("Authorization", &self.authorization)
            .set("Accept", "application/json")
    }

    /// Turn a ureq result into a response of any status. Only transport
    /// failures are errors here; status checks belong to the caller.
    fn read(
        url: String,
        result: std::result::Result<ureq::Response, ureq::Error>,
    ) -> Result<RawResponse> {
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => return Err(transport.into()),
        };

        let status = response.status();
        let mut bytes = Vec::new();
        response.into_reader().read_to_end(&mut bytes)?;
        // Invalid UTF-8 surfaces later as a JSON decode error, after the
        // status check.
        let body = String::from_utf8_lossy(&bytes).into_owned();

        debug!(url = %url, status, "Received response");
        Ok(RawResponse { url, status, body })
    }
}
