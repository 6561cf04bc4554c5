// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task types: reusable definitions of work.
//!
//! One generic model and manager serve both variants. The shared fields
//! live on [`TaskType`] and [`TaskTypeFields`]; the variant's extension
//! record (`K::Fields`) is flattened into the same JSON object, so the
//! generic code never needs to know what it contains.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::kind::{Container, ContainerFields, ContainerType, Executable, TaskKind};
use super::{null_as_default, timestamp};
use crate::client::SaltantClient;
use crate::error::Result;
use crate::resource::{Resource, ResourceManager};

/// A task type as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: TaskKind")]
pub struct TaskType<K: TaskKind> {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Username of the task type's author.
    pub user: String,
    #[serde(deserialize_with = "timestamp")]
    pub datetime_created: DateTime<Utc>,
    /// For container task types, the command run inside the container.
    pub command_to_run: String,
    /// Environment variables the worker host must provide.
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment_variables: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_arguments: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required_arguments_default_values: Map<String, Value>,
    #[serde(flatten)]
    pub fields: K::Fields,
}

pub type ExecutableTaskType = TaskType<Executable>;
pub type ContainerTaskType = TaskType<Container>;

impl<K: TaskKind> Resource for TaskType<K> {
    type Key = i64;

    const KIND: &'static str = "task type";
    const LIST_PATH: &'static str = K::TYPE_LIST_PATH;
    const DETAIL_PATH: &'static str = K::TYPE_DETAIL_PATH;

    fn key(&self) -> i64 {
        self.id
    }
}

impl<K: TaskKind> fmt::Display for TaskType<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.user)
    }
}

impl<K: TaskKind> TaskType<K> {
    /// Fetch the latest server state of this task type.
    pub fn sync(&self, client: &SaltantClient) -> Result<TaskType<K>> {
        client.manager::<TaskType<K>>().refetch(self)
    }

    /// Push every local field, including the variant's, to the server.
    pub fn put(&self, client: &SaltantClient) -> Result<TaskType<K>> {
        client
            .manager::<TaskType<K>>()
            .put(self.id, &TaskTypeFields::from(self))
    }
}

/// Writable task type fields, used by create and put.
///
/// List and map fields always serialize as `[]` / `{}` when empty, never
/// as null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "K: TaskKind")]
pub struct TaskTypeFields<K: TaskKind> {
    pub name: String,
    pub description: String,
    pub command_to_run: String,
    pub environment_variables: Vec<String>,
    pub required_arguments: Vec<String>,
    pub required_arguments_default_values: Map<String, Value>,
    #[serde(flatten)]
    pub fields: K::Fields,
}

pub type ExecutableTaskTypeFields = TaskTypeFields<Executable>;
pub type ContainerTaskTypeFields = TaskTypeFields<Container>;

impl<K: TaskKind> TaskTypeFields<K> {
    /// Shared fields with empty defaults plus the given extension record.
    pub fn with_kind_fields(
        name: impl Into<String>,
        command_to_run: impl Into<String>,
        fields: K::Fields,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            command_to_run: command_to_run.into(),
            environment_variables: Vec::new(),
            required_arguments: Vec::new(),
            required_arguments_default_values: Map::new(),
            fields,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_environment_variables(mut self, variables: Vec<String>) -> Self {
        self.environment_variables = variables;
        self
    }

    pub fn with_required_arguments(mut self, arguments: Vec<String>) -> Self {
        self.required_arguments = arguments;
        self
    }

    pub fn with_required_arguments_default_values(mut self, defaults: Map<String, Value>) -> Self {
        self.required_arguments_default_values = defaults;
        self
    }

    /// Set the default value of one required argument.
    pub fn with_default_value(mut self, argument: impl Into<String>, value: Value) -> Self {
        self.required_arguments_default_values
            .insert(argument.into(), value);
        self
    }
}

impl TaskTypeFields<Executable> {
    pub fn new(name: impl Into<String>, command_to_run: impl Into<String>) -> Self {
        Self::with_kind_fields(name, command_to_run, Default::default())
    }

    pub fn with_json_file_option(mut self, option: impl Into<String>) -> Self {
        self.fields.json_file_option = Some(option.into());
        self
    }
}

impl TaskTypeFields<Container> {
    pub fn new(
        name: impl Into<String>,
        command_to_run: impl Into<String>,
        container_image: impl Into<String>,
        container_type: ContainerType,
    ) -> Self {
        Self::with_kind_fields(
            name,
            command_to_run,
            ContainerFields::new(container_image, container_type),
        )
    }

    pub fn with_logs_path(mut self, path: impl Into<String>) -> Self {
        self.fields.logs_path = path.into();
        self
    }

    pub fn with_results_path(mut self, path: impl Into<String>) -> Self {
        self.fields.results_path = path.into();
        self
    }
}

impl<K: TaskKind> From<&TaskType<K>> for TaskTypeFields<K> {
    fn from(task_type: &TaskType<K>) -> Self {
        Self {
            name: task_type.name.clone(),
            description: task_type.description.clone(),
            command_to_run: task_type.command_to_run.clone(),
            environment_variables: task_type.environment_variables.clone(),
            required_arguments: task_type.required_arguments.clone(),
            required_arguments_default_values: task_type.required_arguments_default_values.clone(),
            fields: task_type.fields.clone(),
        }
    }
}

pub type ExecutableTaskTypeManager<'c> = ResourceManager<'c, ExecutableTaskType>;
pub type ContainerTaskTypeManager<'c> = ResourceManager<'c, ContainerTaskType>;

impl<K: TaskKind> ResourceManager<'_, TaskType<K>> {
    /// Get a task type by id xor name.
    ///
    /// Names are not unique server-side; a name lookup returns the first
    /// match.
    pub fn get(&self, id: Option<i64>, name: Option<&str>) -> Result<TaskType<K>> {
        self.lookup(id, name)
    }

    pub fn get_by_id(&self, id: i64) -> Result<TaskType<K>> {
        self.fetch(id)
    }

    pub fn get_by_name(&self, name: &str) -> Result<TaskType<K>> {
        self.first_named(name)
    }

    #[instrument(skip(self, data), fields(kind = K::NAME, name = %data.name))]
    pub fn create(&self, data: &TaskTypeFields<K>) -> Result<TaskType<K>> {
        let task_type = self.create_from(data)?;
        info!(id = task_type.id, "Created task type");
        Ok(task_type)
    }

    /// Replace every field of the task type.
    #[instrument(skip(self, data), fields(kind = K::NAME))]
    pub fn put(&self, id: i64, data: &TaskTypeFields<K>) -> Result<TaskType<K>> {
        self.put_to(id, data)
    }
}
