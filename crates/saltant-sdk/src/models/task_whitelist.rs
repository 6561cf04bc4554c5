// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task whitelists.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::null_as_default;
use crate::client::SaltantClient;
use crate::error::Result;
use crate::resource::{Resource, ResourceManager};

/// An allow-list of task types a queue may run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWhitelist {
    pub id: i64,
    pub user: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub whitelisted_container_task_types: Vec<i64>,
    #[serde(default)]
    pub whitelisted_executable_task_types: Vec<i64>,
}

impl Resource for TaskWhitelist {
    type Key = i64;

    const KIND: &'static str = "task whitelist";
    const LIST_PATH: &'static str = "taskwhitelists/";
    const DETAIL_PATH: &'static str = "taskwhitelists/{id}/";

    fn key(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for TaskWhitelist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TaskWhitelist {
    pub fn sync(&self, client: &SaltantClient) -> Result<TaskWhitelist> {
        client.task_whitelists().refetch(self)
    }

    pub fn put(&self, client: &SaltantClient) -> Result<TaskWhitelist> {
        client
            .task_whitelists()
            .put(self.id, &TaskWhitelistFields::from(self))
    }

    /// Alias for [`TaskWhitelist::put`]; both push the full local state.
    pub fn patch(&self, client: &SaltantClient) -> Result<TaskWhitelist> {
        self.put(client)
    }
}

/// Full set of writable whitelist fields, used by create and put.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWhitelistFields {
    pub name: String,
    pub description: String,
    pub whitelisted_container_task_types: Vec<i64>,
    pub whitelisted_executable_task_types: Vec<i64>,
}

impl TaskWhitelistFields {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            whitelisted_container_task_types: Vec::new(),
            whitelisted_executable_task_types: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_container_task_types(mut self, ids: Vec<i64>) -> Self {
        self.whitelisted_container_task_types = ids;
        self
    }

    pub fn with_executable_task_types(mut self, ids: Vec<i64>) -> Self {
        self.whitelisted_executable_task_types = ids;
        self
    }
}

impl From<&TaskWhitelist> for TaskWhitelistFields {
    fn from(whitelist: &TaskWhitelist) -> Self {
        Self {
            name: whitelist.name.clone(),
            description: whitelist.description.clone(),
            whitelisted_container_task_types: whitelist.whitelisted_container_task_types.clone(),
            whitelisted_executable_task_types: whitelist.whitelisted_executable_task_types.clone(),
        }
    }
}

/// Partial whitelist update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskWhitelistPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelisted_container_task_types: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelisted_executable_task_types: Option<Vec<i64>>,
}

impl TaskWhitelistPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_container_task_types(mut self, ids: Vec<i64>) -> Self {
        self.whitelisted_container_task_types = Some(ids);
        self
    }

    pub fn with_executable_task_types(mut self, ids: Vec<i64>) -> Self {
        self.whitelisted_executable_task_types = Some(ids);
        self
    }
}

pub type TaskWhitelistManager<'c> = ResourceManager<'c, TaskWhitelist>;

impl ResourceManager<'_, TaskWhitelist> {
    /// Get a task whitelist by id xor name.
    pub fn get(&self, id: Option<i64>, name: Option<&str>) -> Result<TaskWhitelist> {
        self.lookup(id, name)
    }

    pub fn get_by_id(&self, id: i64) -> Result<TaskWhitelist> {
        self.fetch(id)
    }

    pub fn get_by_name(&self, name: &str) -> Result<TaskWhitelist> {
        self.first_named(name)
    }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub fn create(&self, data: &TaskWhitelistFields) -> Result<TaskWhitelist> {
        let whitelist = self.create_from(data)?;
        info!(id = whitelist.id, "Created task whitelist");
        Ok(whitelist)
    }

    #[instrument(skip(self, data))]
    pub fn put(&self, id: i64, data: &TaskWhitelistFields) -> Result<TaskWhitelist> {
        self.put_to(id, data)
    }

    #[instrument(skip(self))]
    pub fn patch(&self, id: i64, patch: &TaskWhitelistPatch) -> Result<TaskWhitelist> {
        self.patch_to(id, patch)
    }
}
