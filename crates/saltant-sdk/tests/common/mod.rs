// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use saltant_sdk::{SaltantClient, SdkConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const TOKEN: &str = "p0gch4mp101fy451do9uod1s1x9i4a";

/// Run blocking client code off the runtime driving the mock server.
pub async fn blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

pub fn api_url(server: &MockServer) -> String {
    format!("{}/api/", server.uri())
}

/// Client pointed at the mock server, without the startup auth check.
pub fn client_for(server: &MockServer) -> SaltantClient {
    SaltantClient::new(SdkConfig::new(api_url(server), TOKEN).with_test_if_authenticated(false))
        .expect("client config should be valid")
}

pub fn page(results: Vec<Value>) -> Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results,
    })
}

pub fn task_queue_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "user": "matt",
        "name": name,
        "description": "",
        "private": false,
        "active": true,
        "runs_executable_tasks": true,
        "runs_docker_container_tasks": true,
        "runs_singularity_container_tasks": false,
        "whitelists": [],
    })
}

pub fn executable_task_type_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": "",
        "user": "matt",
        "datetime_created": "2018-05-14T17:20:51.478213Z",
        "command_to_run": "echo hello",
        "environment_variables": [],
        "required_arguments": [],
        "required_arguments_default_values": {},
        "json_file_option": null,
    })
}

pub fn task_instance_json(uuid: &str, state: &str) -> Value {
    let finished = match state {
        "successful" | "failed" | "terminated" => json!("2018-05-14T17:25:03.000000Z"),
        _ => Value::Null,
    };
    json!({
        "uuid": uuid,
        "name": "",
        "state": state,
        "user": "matt",
        "task_queue": 1,
        "task_type": 2,
        "datetime_created": "2018-05-14T17:20:51.478213Z",
        "datetime_finished": finished,
        "arguments": {},
    })
}
