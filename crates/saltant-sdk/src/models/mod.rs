// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Typed models and the manager operations specific to each of them.

mod kind;
mod task_instance;
mod task_queue;
mod task_type;
mod task_whitelist;
mod user;

pub use kind::{Container, ContainerFields, ContainerType, Executable, ExecutableFields, TaskKind};
pub use task_instance::{
    ContainerTaskInstance, ContainerTaskInstanceManager, ExecutableTaskInstance,
    ExecutableTaskInstanceManager, NewTaskInstance, TaskInstance, TaskInstanceState,
};
pub use task_queue::{TaskQueue, TaskQueueFields, TaskQueueManager, TaskQueuePatch};
pub use task_type::{
    ContainerTaskType, ContainerTaskTypeFields, ContainerTaskTypeManager, ExecutableTaskType,
    ExecutableTaskTypeFields, ExecutableTaskTypeManager, TaskType, TaskTypeFields,
};
pub use task_whitelist::{
    TaskWhitelist, TaskWhitelistFields, TaskWhitelistManager, TaskWhitelistPatch,
};
pub use user::{User, UserManager};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Naive layouts accepted when a timestamp carries no offset.
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Read `null` as the type's default (e.g. an empty description).
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse an ISO-8601 timestamp. One without an offset is taken as UTC.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

pub(crate) fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", raw)))
}

pub(crate) fn optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_timestamp(&raw)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp {:?}", raw)))
        })
        .transpose()
}
