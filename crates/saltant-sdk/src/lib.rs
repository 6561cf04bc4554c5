// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Saltant SDK
//!
//! Blocking client for the REST API of a saltant server.
//!
//! The client owns one authenticated HTTP session and hands out a manager
//! per resource family:
//! - Task queues and task whitelists (list, get, create, put, patch)
//! - Users (list, get)
//! - Executable and container task types (list, get, create, put)
//! - Executable and container task instances (list, get, create, clone,
//!   terminate, wait until finished)
//!
//! Models are plain values. Operations on a fetched model, like
//! [`TaskInstance::sync`], take the client explicitly.
//!
//! # Example
//!
//! ```no_run
//! use saltant_sdk::{NewTaskInstance, SaltantClient, SdkConfig, WaitOptions};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SaltantClient::new(SdkConfig::new(
//!     "https://shahlabjobs.ca/api/",
//!     "p0gch4mp101fy451do9uod1s1x9i4a",
//! ))?;
//!
//! let task_type = client.executable_task_types().get_by_name("echo-test")?;
//! let queue = client.task_queues().get_by_name("default")?;
//!
//! let instance = client
//!     .executable_task_instances()
//!     .create(&NewTaskInstance::new(task_type.id, queue.id))?;
//!
//! let finished = instance.wait_until_finished(&client, &WaitOptions::default())?;
//! println!("{} finished as {}", finished.uuid, finished.state);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
pub mod http;
mod models;
pub mod resource;
mod wait;

pub use client::SaltantClient;
pub use config::{
    API_URL_ENV, AUTH_TOKEN_ENV, DEFAULT_TIMEOUT, SKIP_AUTH_CHECK_ENV, SdkConfig, TIMEOUT_ENV,
};
pub use error::{Result, SdkError};
pub use models::{
    Container, ContainerFields, ContainerTaskInstance, ContainerTaskInstanceManager,
    ContainerTaskType, ContainerTaskTypeFields, ContainerTaskTypeManager, ContainerType,
    Executable, ExecutableFields, ExecutableTaskInstance, ExecutableTaskInstanceManager,
    ExecutableTaskType, ExecutableTaskTypeFields, ExecutableTaskTypeManager, NewTaskInstance,
    TaskInstance, TaskInstanceState, TaskKind, TaskQueue, TaskQueueFields, TaskQueueManager,
    TaskQueuePatch, TaskType, TaskTypeFields, TaskWhitelist, TaskWhitelistFields,
    TaskWhitelistManager, TaskWhitelistPatch, User, UserManager,
};
pub use resource::{ListFilters, MAX_PAGE_SIZE, Resource, ResourceManager};
pub use wait::{CancelFlag, DEFAULT_REFRESH_PERIOD, WaitOptions};
