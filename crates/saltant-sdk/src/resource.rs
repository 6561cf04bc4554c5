// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Generic CRUD-over-HTTP manager shared by every resource family.
//!
//! A [`Resource`] names its list and detail paths; [`ResourceManager`]
//! turns those into list/get/create/put/patch calls and decodes the
//! responses. Typed managers are inherent impls on
//! `ResourceManager<'_, ConcreteResource>` living next to each model.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Result, SdkError};
use crate::http::{HTTP_200_OK, HTTP_201_CREATED, RawResponse, Session};

/// Page size sent when the caller does not ask for one, so a single list
/// call returns the whole collection.
pub const MAX_PAGE_SIZE: i64 = i64::MAX;

/// A server-side entity exposed through the REST API.
pub trait Resource: DeserializeOwned {
    /// Identifier substituted into `DETAIL_PATH`.
    type Key: fmt::Display;

    /// Human-readable name of the resource family, used in messages.
    const KIND: &'static str;
    /// Collection path relative to the base API URL.
    const LIST_PATH: &'static str;
    /// Per-resource path with an `{id}` placeholder.
    const DETAIL_PATH: &'static str;

    /// The key this resource is fetched by.
    fn key(&self) -> Self::Key;

    /// Detail path for a specific key.
    fn detail_path(key: &impl fmt::Display) -> String {
        Self::DETAIL_PATH.replace("{id}", &key.to_string())
    }
}

/// Query parameters for a list call, in the server's filter syntax
/// (e.g. `name__startswith`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    params: BTreeMap<String, String>,
}

impl ListFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing any previous value for the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Filter on exact name.
    pub fn with_name(self, name: impl ToString) -> Self {
        self.with("name", name)
    }

    /// Request a specific page (disables the single-page default).
    pub fn with_page(self, page: u64) -> Self {
        self.with("page", page)
    }

    /// Request a specific page size (disables the single-page default).
    pub fn with_page_size(self, page_size: u64) -> Self {
        self.with("page_size", page_size)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Query pairs as sent, with `page=1` and `page_size=MAX_PAGE_SIZE`
    /// filled in for whichever of the two the caller left unset.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = self.params.clone();
        params
            .entry("page".to_string())
            .or_insert_with(|| "1".to_string());
        params
            .entry("page_size".to_string())
            .or_insert_with(|| MAX_PAGE_SIZE.to_string());
        params.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for ListFilters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filters, (k, v)| filters.with(k, v))
    }
}

#[derive(Deserialize)]
struct Page {
    results: Vec<Value>,
}

/// Compare the observed status with the one the operation expects.
///
/// This is the only place HTTP responses are classified as failures.
pub fn validate_request_success(response: &RawResponse, expected_status: u16) -> Result<()> {
    if response.status == expected_status {
        return Ok(());
    }
    Err(SdkError::BadRequest {
        url: response.url.clone(),
        status: response.status,
        expected: expected_status,
        body: response.body.clone(),
    })
}

/// Manager for one resource family, borrowing the client's session.
pub struct ResourceManager<'c, R> {
    session: &'c Session,
    _resource: PhantomData<fn() -> R>,
}

impl<R> fmt::Debug for ResourceManager<'_, R>
where
    R: Resource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceManager")
            .field("kind", &R::KIND)
            .field("list_url", &self.list_url())
            .finish()
    }
}

impl<'c, R: Resource> ResourceManager<'c, R> {
    pub fn new(session: &'c Session) -> Self {
        Self {
            session,
            _resource: PhantomData,
        }
    }

    /// Absolute URL of the collection.
    pub fn list_url(&self) -> String {
        self.session.url(R::LIST_PATH)
    }

    /// Absolute URL of one resource.
    pub fn detail_url(&self, key: &impl fmt::Display) -> String {
        self.session.url(&R::detail_path(key))
    }

    /// List resources matching `filters`, in server order.
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub fn list(&self, filters: &ListFilters) -> Result<Vec<R>> {
        let response = self.session.get(R::LIST_PATH, &filters.to_query())?;
        validate_request_success(&response, HTTP_200_OK)?;

        let page: Page = response.json()?;
        debug!(count = page.results.len(), "Listed resources");

        page.results
            .into_iter()
            .map(|data| self.response_data_to_model_instance(data))
            .collect()
    }

    /// Fetch the resource at a known key.
    #[instrument(skip(self, key), fields(kind = R::KIND, key = %key))]
    pub fn fetch(&self, key: impl fmt::Display) -> Result<R> {
        let response = self.session.get(&R::detail_path(&key), &[])?;
        validate_request_success(&response, HTTP_200_OK)?;
        self.response_data_to_model_instance(response.json()?)
    }

    /// Fetch the latest server state of a resource already in hand.
    pub fn refetch(&self, resource: &R) -> Result<R> {
        self.fetch(resource.key())
    }

    /// POST `body` to the collection; expects 201.
    pub fn create_from<B: Serialize + ?Sized>(&self, body: &B) -> Result<R> {
        let response = self.session.post(R::LIST_PATH, Some(body))?;
        validate_request_success(&response, HTTP_201_CREATED)?;
        self.response_data_to_model_instance(response.json()?)
    }

    /// Replace the full record at `key`; expects 200.
    pub fn put_to<B: Serialize + ?Sized>(&self, key: impl fmt::Display, body: &B) -> Result<R> {
        let response = self.session.put(&R::detail_path(&key), body)?;
        validate_request_success(&response, HTTP_200_OK)?;
        self.response_data_to_model_instance(response.json()?)
    }

    /// Update only the fields present in `body`; expects 200.
    pub fn patch_to<B: Serialize + ?Sized>(&self, key: impl fmt::Display, body: &B) -> Result<R> {
        let response = self.session.patch(&R::detail_path(&key), body)?;
        validate_request_success(&response, HTTP_200_OK)?;
        self.response_data_to_model_instance(response.json()?)
    }

    /// POST with no body to `{detail}{action}/`, e.g. `clone` or `terminate`.
    pub(crate) fn post_action(
        &self,
        key: impl fmt::Display,
        action: &str,
        expected_status: u16,
    ) -> Result<R> {
        let path = format!("{}{}/", R::detail_path(&key), action);
        let response = self.session.post::<Value>(&path, None)?;
        validate_request_success(&response, expected_status)?;
        self.response_data_to_model_instance(response.json()?)
    }

    /// Build a model from one decoded response object.
    ///
    /// ISO-8601 timestamp fields become `DateTime<Utc>` and `null`
    /// timestamps become `None` through the model's serde definition.
    pub fn response_data_to_model_instance(&self, data: Value) -> Result<R> {
        serde_json::from_value(data).map_err(|e| {
            SdkError::Serialization(format!("malformed {} in response: {}", R::KIND, e))
        })
    }

    /// Exactly one of `id` or `name` must be given. A name lookup returns
    /// the first match, since names are not unique server-side.
    pub(crate) fn lookup(&self, id: Option<R::Key>, name: Option<&str>) -> Result<R> {
        match (id, name) {
            (Some(id), None) => self.fetch(id),
            (None, Some(name)) => self.first_named(name),
            _ => Err(SdkError::InvalidInput(
                "either id or name must be set (but not both)".to_string(),
            )),
        }
    }

    pub(crate) fn first_named(&self, name: &str) -> Result<R> {
        self.list(&ListFilters::new().with_name(name))?
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::NotFound(format!("no {} named {:?}", R::KIND, name)))
    }
}
