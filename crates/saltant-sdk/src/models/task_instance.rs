// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task instances: concrete runs of a task type on a task queue.
//!
//! Instances are keyed by UUID. Besides create/get/list they support
//! cloning and termination, and [`crate::wait`] adds the blocking poll.

use std::fmt;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::kind::{Container, Executable, TaskKind};
use super::{null_as_default, optional_timestamp, timestamp};
use crate::client::SaltantClient;
use crate::error::Result;
use crate::http::{HTTP_201_CREATED, HTTP_202_ACCEPTED};
use crate::resource::{Resource, ResourceManager};
use crate::wait::WaitOptions;

/// Task instance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskInstanceState {
    /// Instance created, not yet handed to a worker queue.
    Created,
    /// Instance published to its queue.
    Published,
    /// A worker is executing the instance.
    Running,
    /// Instance finished successfully.
    Successful,
    /// Instance finished with an error.
    Failed,
    /// Instance was terminated.
    Terminated,
}

impl TaskInstanceState {
    /// Check if this is a terminal state. No transitions follow one.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskInstanceState::Successful
                | TaskInstanceState::Failed
                | TaskInstanceState::Terminated
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Published => "published",
            Self::Running => "running",
            Self::Successful => "successful",
            Self::Failed => "failed",
            Self::Terminated => "terminated",
        }
    }
}

impl fmt::Display for TaskInstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task instance as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: TaskKind")]
pub struct TaskInstance<K: TaskKind> {
    pub uuid: Uuid,
    /// Optional display name; empty when unset.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub state: TaskInstanceState,
    /// Username of whoever started the instance.
    pub user: String,
    /// ID of the task queue the instance runs on.
    pub task_queue: i64,
    /// ID of the instance's task type.
    pub task_type: i64,
    #[serde(deserialize_with = "timestamp")]
    pub datetime_created: DateTime<Utc>,
    /// Null until the instance reaches a terminal state.
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub datetime_finished: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arguments: Map<String, Value>,
    #[serde(skip)]
    kind: PhantomData<K>,
}

pub type ExecutableTaskInstance = TaskInstance<Executable>;
pub type ContainerTaskInstance = TaskInstance<Container>;

impl<K: TaskKind> Resource for TaskInstance<K> {
    type Key = Uuid;

    const KIND: &'static str = "task instance";
    const LIST_PATH: &'static str = K::INSTANCE_LIST_PATH;
    const DETAIL_PATH: &'static str = K::INSTANCE_DETAIL_PATH;

    fn key(&self) -> Uuid {
        self.uuid
    }
}

impl<K: TaskKind> fmt::Display for TaskInstance<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{} ({})", self.uuid, self.state)
        } else {
            write!(f, "{} [{}] ({})", self.name, self.uuid, self.state)
        }
    }
}

impl<K: TaskKind> TaskInstance<K> {
    /// Re-fetch this instance by UUID.
    ///
    /// The refreshed state is returned as a new value; `self` and any
    /// copies of it keep the old state.
    pub fn sync(&self, client: &SaltantClient) -> Result<TaskInstance<K>> {
        client.manager::<TaskInstance<K>>().refetch(self)
    }

    /// Clone this instance on the server, returning the new instance.
    pub fn clone_instance(&self, client: &SaltantClient) -> Result<TaskInstance<K>> {
        client.manager::<TaskInstance<K>>().clone(self.uuid)
    }

    /// Ask the server to terminate this instance.
    pub fn terminate(&self, client: &SaltantClient) -> Result<TaskInstance<K>> {
        client.manager::<TaskInstance<K>>().terminate(self.uuid)
    }

    /// Block until this instance reaches a terminal state.
    pub fn wait_until_finished(
        &self,
        client: &SaltantClient,
        options: &WaitOptions,
    ) -> Result<TaskInstance<K>> {
        client
            .manager::<TaskInstance<K>>()
            .wait_until_finished(self.uuid, options)
    }
}

/// Request body for creating a task instance (either variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTaskInstance {
    pub name: String,
    pub task_type: i64,
    pub task_queue: i64,
    pub arguments: Map<String, Value>,
}

impl NewTaskInstance {
    /// An unnamed instance with no arguments.
    pub fn new(task_type: i64, task_queue: i64) -> Self {
        Self {
            name: String::new(),
            task_type,
            task_queue,
            arguments: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: Value) -> Self {
        self.arguments.insert(name.into(), value);
        self
    }
}

pub type ExecutableTaskInstanceManager<'c> = ResourceManager<'c, ExecutableTaskInstance>;
pub type ContainerTaskInstanceManager<'c> = ResourceManager<'c, ContainerTaskInstance>;

impl<K: TaskKind> ResourceManager<'_, TaskInstance<K>> {
    pub fn get(&self, uuid: Uuid) -> Result<TaskInstance<K>> {
        self.fetch(uuid)
    }

    #[instrument(skip(self, data), fields(kind = K::NAME, task_type = data.task_type, task_queue = data.task_queue))]
    pub fn create(&self, data: &NewTaskInstance) -> Result<TaskInstance<K>> {
        let instance = self.create_from(data)?;
        info!(uuid = %instance.uuid, "Created task instance");
        Ok(instance)
    }

    /// Start a new instance with the same configuration as `uuid`.
    #[instrument(skip(self), fields(kind = K::NAME))]
    pub fn clone(&self, uuid: Uuid) -> Result<TaskInstance<K>> {
        let instance = self.post_action(uuid, "clone", HTTP_201_CREATED)?;
        info!(clone = %instance.uuid, "Cloned task instance");
        Ok(instance)
    }

    /// Clone each instance in order.
    ///
    /// Stops at the first failure; clones already made stay made.
    pub fn clone_many(&self, uuids: &[Uuid]) -> Result<Vec<TaskInstance<K>>> {
        uuids.iter().map(|uuid| self.clone(*uuid)).collect()
    }

    /// Request termination. The server accepts (202) and applies it
    /// asynchronously, so the returned state may not be terminal yet.
    #[instrument(skip(self), fields(kind = K::NAME))]
    pub fn terminate(&self, uuid: Uuid) -> Result<TaskInstance<K>> {
        let instance = self.post_action(uuid, "terminate", HTTP_202_ACCEPTED)?;
        info!(state = %instance.state, "Requested task instance termination");
        Ok(instance)
    }

    /// Terminate each instance in order, stopping at the first failure.
    pub fn terminate_many(&self, uuids: &[Uuid]) -> Result<Vec<TaskInstance<K>>> {
        uuids.iter().map(|uuid| self.terminate(*uuid)).collect()
    }
}
