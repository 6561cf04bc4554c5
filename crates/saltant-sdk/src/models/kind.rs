// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Executable and container task variants.
//!
//! Task types and task instances exist in two flavours that share every
//! operation and differ only in endpoints and, for task types, a few extra
//! fields. A [`TaskKind`] marker carries both.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A task variant: its endpoints and the extension record its task types
/// carry on top of the shared fields.
pub trait TaskKind: fmt::Debug + Clone + PartialEq + Send + Sync + 'static {
    /// Variant-specific task type fields, flattened into the same JSON
    /// object as the shared ones.
    type Fields: fmt::Debug + Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    const NAME: &'static str;

    const TYPE_LIST_PATH: &'static str;
    const TYPE_DETAIL_PATH: &'static str;
    const INSTANCE_LIST_PATH: &'static str;
    const INSTANCE_DETAIL_PATH: &'static str;
}

/// Tasks run as a command on the worker host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Executable;

/// Tasks run inside a Docker or Singularity container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Container;

impl TaskKind for Executable {
    type Fields = ExecutableFields;

    const NAME: &'static str = "executable";

    const TYPE_LIST_PATH: &'static str = "executabletasktypes/";
    const TYPE_DETAIL_PATH: &'static str = "executabletasktypes/{id}/";
    const INSTANCE_LIST_PATH: &'static str = "executabletaskinstances/";
    const INSTANCE_DETAIL_PATH: &'static str = "executabletaskinstances/{id}/";
}

impl TaskKind for Container {
    type Fields = ContainerFields;

    const NAME: &'static str = "container";

    const TYPE_LIST_PATH: &'static str = "containertasktypes/";
    const TYPE_DETAIL_PATH: &'static str = "containertasktypes/{id}/";
    const INSTANCE_LIST_PATH: &'static str = "containertaskinstances/";
    const INSTANCE_DETAIL_PATH: &'static str = "containertaskinstances/{id}/";
}

/// Fields only executable task types have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutableFields {
    /// Command-line option that takes a JSON file holding the instance's
    /// arguments. When unset, arguments are passed as a JSON string.
    #[serde(default)]
    pub json_file_option: Option<String>,
}

/// Container engine a container task type runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerType {
    Docker,
    Singularity,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Singularity => "singularity",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields only container task types have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerFields {
    /// Image name and tag, e.g. `ubuntu:14.04` for Docker or
    /// `docker://ubuntu:14.04` / `shub://vsoch/hello-world` for Singularity.
    pub container_image: String,
    pub container_type: ContainerType,
    /// Logs directory inside the container.
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs_path: String,
    /// Results directory inside the container.
    #[serde(default, deserialize_with = "null_as_default")]
    pub results_path: String,
}

impl ContainerFields {
    pub fn new(container_image: impl Into<String>, container_type: ContainerType) -> Self {
        Self {
            container_image: container_image.into(),
            container_type,
            logs_path: String::new(),
            results_path: String::new(),
        }
    }
}
