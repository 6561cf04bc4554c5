// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task queues.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::null_as_default;
use crate::client::SaltantClient;
use crate::error::Result;
use crate::resource::{Resource, ResourceManager};

/// A named destination task instances are submitted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskQueue {
    pub id: i64,
    /// Username of the queue's owner.
    pub user: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Only the owner may submit to a private queue.
    pub private: bool,
    pub active: bool,
    #[serde(default)]
    pub runs_executable_tasks: bool,
    #[serde(default)]
    pub runs_docker_container_tasks: bool,
    #[serde(default)]
    pub runs_singularity_container_tasks: bool,
    /// IDs of the task whitelists applied to this queue.
    #[serde(default)]
    pub whitelists: Vec<i64>,
}

impl Resource for TaskQueue {
    type Key = i64;

    const KIND: &'static str = "task queue";
    const LIST_PATH: &'static str = "taskqueues/";
    const DETAIL_PATH: &'static str = "taskqueues/{id}/";

    fn key(&self) -> i64 {
        self.id
    }
}

impl fmt::Display for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TaskQueue {
    /// Fetch the latest server state of this queue.
    ///
    /// Returns a new value; `self` is left untouched.
    pub fn sync(&self, client: &SaltantClient) -> Result<TaskQueue> {
        client.task_queues().refetch(self)
    }

    /// Push every local field to the server.
    pub fn put(&self, client: &SaltantClient) -> Result<TaskQueue> {
        client
            .task_queues()
            .put(self.id, &TaskQueueFields::from(self))
    }

    /// Same as [`TaskQueue::put`], sent as a PATCH carrying every field.
    pub fn patch(&self, client: &SaltantClient) -> Result<TaskQueue> {
        client
            .task_queues()
            .patch(self.id, &TaskQueuePatch::from(self))
    }
}

/// Full set of writable task queue fields, used by create and put.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskQueueFields {
    pub name: String,
    pub description: String,
    pub private: bool,
    pub active: bool,
    pub runs_executable_tasks: bool,
    pub runs_docker_container_tasks: bool,
    pub runs_singularity_container_tasks: bool,
    pub whitelists: Vec<i64>,
}

impl TaskQueueFields {
    /// A public, active queue accepting every kind of task.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            private: false,
            active: true,
            runs_executable_tasks: true,
            runs_docker_container_tasks: true,
            runs_singularity_container_tasks: true,
            whitelists: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_runs_executable_tasks(mut self, runs: bool) -> Self {
        self.runs_executable_tasks = runs;
        self
    }

    pub fn with_runs_docker_container_tasks(mut self, runs: bool) -> Self {
        self.runs_docker_container_tasks = runs;
        self
    }

    pub fn with_runs_singularity_container_tasks(mut self, runs: bool) -> Self {
        self.runs_singularity_container_tasks = runs;
        self
    }

    pub fn with_whitelists(mut self, whitelists: Vec<i64>) -> Self {
        self.whitelists = whitelists;
        self
    }
}

impl From<&TaskQueue> for TaskQueueFields {
    fn from(queue: &TaskQueue) -> Self {
        Self {
            name: queue.name.clone(),
            description: queue.description.clone(),
            private: queue.private,
            active: queue.active,
            runs_executable_tasks: queue.runs_executable_tasks,
            runs_docker_container_tasks: queue.runs_docker_container_tasks,
            runs_singularity_container_tasks: queue.runs_singularity_container_tasks,
            whitelists: queue.whitelists.clone(),
        }
    }
}

/// Partial task queue update. Unset fields are left alone server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskQueuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_executable_tasks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_docker_container_tasks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runs_singularity_container_tasks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whitelists: Option<Vec<i64>>,
}

impl TaskQueuePatch {
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

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = Some(private);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn with_runs_executable_tasks(mut self, runs: bool) -> Self {
        self.runs_executable_tasks = Some(runs);
        self
    }

    pub fn with_runs_docker_container_tasks(mut self, runs: bool) -> Self {
        self.runs_docker_container_tasks = Some(runs);
        self
    }

    pub fn with_runs_singularity_container_tasks(mut self, runs: bool) -> Self {
        self.runs_singularity_container_tasks = Some(runs);
        self
    }

    pub fn with_whitelists(mut self, whitelists: Vec<i64>) -> Self {
        self.whitelists = Some(whitelists);
        self
    }
}

impl From<&TaskQueue> for TaskQueuePatch {
    fn from(queue: &TaskQueue) -> Self {
        let TaskQueueFields {
            name,
            description,
            private,
            active,
            runs_executable_tasks,
            runs_docker_container_tasks,
            runs_singularity_container_tasks,
            whitelists,
        } = TaskQueueFields::from(queue);
        Self {
            name: Some(name),
            description: Some(description),
            private: Some(private),
            active: Some(active),
            runs_executable_tasks: Some(runs_executable_tasks),
            runs_docker_container_tasks: Some(runs_docker_container_tasks),
            runs_singularity_container_tasks: Some(runs_singularity_container_tasks),
            whitelists: Some(whitelists),
        }
    }
}

pub type TaskQueueManager<'c> = ResourceManager<'c, TaskQueue>;

impl ResourceManager<'_, TaskQueue> {
    /// Get a task queue by id xor name.
    pub fn get(&self, id: Option<i64>, name: Option<&str>) -> Result<TaskQueue> {
        self.lookup(id, name)
    }

    pub fn get_by_id(&self, id: i64) -> Result<TaskQueue> {
        self.fetch(id)
    }

    /// First queue with this name.
    pub fn get_by_name(&self, name: &str) -> Result<TaskQueue> {
        self.first_named(name)
    }

    #[instrument(skip(self, data), fields(name = %data.name))]
    pub fn create(&self, data: &TaskQueueFields) -> Result<TaskQueue> {
        let queue = self.create_from(data)?;
        info!(id = queue.id, "Created task queue");
        Ok(queue)
    }

    #[instrument(skip(self, data))]
    pub fn put(&self, id: i64, data: &TaskQueueFields) -> Result<TaskQueue> {
        self.put_to(id, data)
    }

    #[instrument(skip(self))]
    pub fn patch(&self, id: i64, patch: &TaskQueuePatch) -> Result<TaskQueue> {
        self.patch_to(id, patch)
    }
}
