// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Task queue, whitelist and user manager tests against a mock server.

mod common;

use common::{blocking, client_for, page, task_queue_json, TOKEN};
use saltant_sdk::{
    ListFilters, SdkError, TaskQueueFields, TaskQueuePatch, TaskWhitelistFields,
};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_list_requests_single_full_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/"))
        .and(query_param("page", "1"))
        .and(query_param("page_size", i64::MAX.to_string()))
        .and(header("Authorization", format!("Token {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![
            task_queue_json(1, "default"),
            task_queue_json(2, "gpu"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let queues = blocking(move || client.task_queues().list(&ListFilters::new()))
        .await
        .unwrap();

    let names: Vec<_> = queues.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["default", "gpu"]);
}

#[tokio::test]
async fn test_list_passes_filters_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/"))
        .and(query_param("user__username", "matt"))
        .and(query_param("page", "2"))
        .and(query_param("page_size", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(vec![task_queue_json(2, "gpu")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let filters = ListFilters::new()
        .with("user__username", "matt")
        .with_page(2)
        .with_page_size(1);
    let queues = blocking(move || client.task_queues().list(&filters))
        .await
        .unwrap();

    assert_eq!(queues.len(), 1);
    assert_eq!(queues[0].id, 2);
}

#[tokio::test]
async fn test_list_error_status_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("server exploded"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = blocking(move || client.task_queues().list(&ListFilters::new()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("server exploded"));
}

#[tokio::test]
async fn test_get_by_id_hits_detail_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_queue_json(3, "default")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let queue = blocking(move || client.task_queues().get(Some(3), None))
        .await
        .unwrap();

    assert_eq!(queue.id, 3);
    assert_eq!(queue.name, "default");
}

#[tokio::test]
async fn test_get_by_name_returns_first_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/"))
        .and(query_param("name", "default"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![
            task_queue_json(4, "default"),
            task_queue_json(9, "default"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let queue = blocking(move || client.task_queues().get(None, Some("default")))
        .await
        .unwrap();

    assert_eq!(queue.id, 4);
}

#[tokio::test]
async fn test_get_by_unknown_name_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/"))
        .and(query_param("name", "missing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = blocking(move || client.task_queues().get_by_name("missing"))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::NotFound(_)));
}

#[tokio::test]
async fn test_get_requires_exactly_one_of_id_and_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_queue_json(1, "default")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (both, neither) = blocking(move || {
        let queues = client.task_queues();
        (queues.get(Some(1), Some("default")), queues.get(None, None))
    })
    .await;

    assert!(matches!(both, Err(SdkError::InvalidInput(_))));
    assert!(matches!(neither, Err(SdkError::InvalidInput(_))));
}

#[tokio::test]
async fn test_create_posts_json_and_expects_201() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/taskqueues/"))
        .and(body_json(json!({
            "name": "gpu",
            "description": "GPU nodes",
            "private": true,
            "active": true,
            "runs_executable_tasks": true,
            "runs_docker_container_tasks": true,
            "runs_singularity_container_tasks": true,
            "whitelists": [],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_queue_json(5, "gpu")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let fields = TaskQueueFields::new("gpu")
        .with_description("GPU nodes")
        .with_private(true);
    let queue = blocking(move || client.task_queues().create(&fields))
        .await
        .unwrap();

    assert_eq!(queue.id, 5);
}

#[tokio::test]
async fn test_create_with_200_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/taskqueues/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_queue_json(5, "gpu")))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = blocking(move || client.task_queues().create(&TaskQueueFields::new("gpu")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SdkError::BadRequest {
            status: 200,
            expected: 201,
            ..
        }
    ));
}

#[tokio::test]
async fn test_put_rejection_reports_url_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/taskqueues/3/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"name": ["This field may not be blank."]})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = format!("{}/api/taskqueues/3/", mock_server.uri());
    let err = blocking(move || client.task_queues().put(3, &TaskQueueFields::new("")))
        .await
        .unwrap_err();

    let message = err.to_string();
    assert_eq!(err.status(), Some(400));
    assert!(message.contains(&url), "{message}");
    assert!(message.contains("This field may not be blank."), "{message}");
}

#[tokio::test]
async fn test_patch_sends_only_changed_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/taskqueues/3/"))
        .and(body_json(json!({"active": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_queue_json(3, "default")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = blocking(move || {
        client
            .task_queues()
            .patch(3, &TaskQueuePatch::new().with_active(false))
    })
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_non_utf8_error_body_is_bad_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/taskqueues/3/"))
        .respond_with(
            ResponseTemplate::new(400).set_body_raw(b"bad\xff\xfe".to_vec(), "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let url = format!("{}/api/taskqueues/3/", mock_server.uri());
    let err = blocking(move || {
        client
            .task_queues()
            .patch(3, &TaskQueuePatch::new().with_name("gpu"))
    })
    .await
    .unwrap_err();

    match err {
        SdkError::BadRequest {
            url: got, status, body, ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(got, url);
            assert!(body.starts_with("bad"));
        }
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_utf8_success_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/3/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"\xff\xfe".to_vec(), "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = blocking(move || client.task_queues().get_by_id(3))
        .await
        .unwrap_err();

    assert!(matches!(err, SdkError::Serialization(_)));
}

#[tokio::test]
async fn test_model_sync_and_put() {
    let mock_server = MockServer::start().await;

    let mut renamed = task_queue_json(3, "renamed");
    renamed["description"] = json!("updated");

    Mock::given(method("GET"))
        .and(path("/api/taskqueues/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_queue_json(3, "default")))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/taskqueues/3/"))
        .and(body_partial_json(json!({"name": "renamed", "active": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(renamed))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (synced, updated) = blocking(move || {
        let queue = client.task_queues().get_by_id(3)?;
        let synced = queue.sync(&client)?;

        let mut local = synced.clone();
        local.name = "renamed".to_string();
        let updated = local.put(&client)?;
        Ok::<_, SdkError>((synced, updated))
    })
    .await
    .unwrap();

    assert_eq!(synced.name, "default");
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.description, "updated");
}

#[tokio::test]
async fn test_whitelist_create_and_get_by_name() {
    let mock_server = MockServer::start().await;

    let whitelist = json!({
        "id": 7,
        "user": "matt",
        "name": "lab",
        "description": "",
        "whitelisted_container_task_types": [],
        "whitelisted_executable_task_types": [2],
    });

    Mock::given(method("POST"))
        .and(path("/api/taskwhitelists/"))
        .and(body_partial_json(json!({
            "name": "lab",
            "whitelisted_executable_task_types": [2],
            "whitelisted_container_task_types": [],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(whitelist.clone()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/taskwhitelists/"))
        .and(query_param("name", "lab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(vec![whitelist])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (created, found) = blocking(move || {
        let whitelists = client.task_whitelists();
        let created = whitelists
            .create(&TaskWhitelistFields::new("lab").with_executable_task_types(vec![2]))?;
        let found = whitelists.get_by_name("lab")?;
        Ok::<_, SdkError>((created, found))
    })
    .await
    .unwrap();

    assert_eq!(created, found);
    assert_eq!(found.whitelisted_executable_task_types, vec![2]);
}

#[tokio::test]
async fn test_user_get_and_sync() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users/matt/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"username": "matt", "email": "matt@example.org"})),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let (user, synced) = blocking(move || {
        let user = client.users().get("matt")?;
        let synced = user.sync(&client)?;
        Ok::<_, SdkError>((user, synced))
    })
    .await
    .unwrap();

    assert_eq!(user, synced);
    assert_eq!(user.username, "matt");
    assert_eq!(user.email, "matt@example.org");
}
