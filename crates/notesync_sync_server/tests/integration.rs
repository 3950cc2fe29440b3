//! End-to-end tests for the sync server.

use notesync_sync_protocol::{encode, SyncResponse};
use notesync_sync_server::{ServerConfig, SyncServer};
use notesync_testkit::prelude::*;
use std::sync::Arc;
use std::thread;

fn server(env: &TestEnv) -> SyncServer {
    SyncServer::new(env.database.clone(), Arc::clone(&env.blobs), ServerConfig::default())
}

fn json(body: &[u8]) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}

#[test]
fn full_round_trip_through_routes() {
    let env = TestEnv::new();
    let server = server(&env);
    let ws = env.workspace_id;

    let request = SnapshotBuilder::new()
        .folder(1, "Work", None)
        .note(10, "Plan", Some(1))
        .image(0, 10, "plan.png", &[7, 7, 7])
        .pin(20, "a")
        .pin(21, "b")
        .connection(0, 20, 21)
        .schedule(0, "2024-05-01", "09:00")
        .build();
    let response = server.handle_sync(ws, COLLABORATOR, &encode(&request).unwrap());
    assert_eq!(response.status, 200);

    let body = json(&response.body);
    for key in [
        "folders",
        "notes",
        "schedule_entries",
        "pinboard_notes",
        "connections",
        "images",
        "lastModified",
        "createdAt",
        "databaseId",
        "userId",
    ] {
        assert!(body.get(key).is_some(), "missing {key}");
    }
    assert_eq!(body["userId"], OWNER.to_string());

    let snapshot: SyncResponse = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(decode_image(&snapshot.images[0]), vec![7, 7, 7]);

    let export = server.handle_export(ws, VIEWER);
    assert_eq!(export.status, 200);
    let exported: SyncResponse = serde_json::from_slice(&export.body).unwrap();
    assert_eq!(exported.notes, snapshot.notes);

    let version = json(&server.handle_version(ws, VIEWER).body);
    assert_eq!(version["version"], 1);

    let changes = json(&server.handle_changes(ws, VIEWER, 0, None).body);
    assert_eq!(changes["changes"].as_array().unwrap().len(), 7);
    assert_eq!(changes["has_more"], false);
}

#[test]
fn access_is_enforced_per_route() {
    let env = TestEnv::new();
    let server = server(&env);
    let ws = env.workspace_id;
    let body = encode(&SnapshotBuilder::new().pin(0, "p").build()).unwrap();

    assert_eq!(server.handle_sync(ws, VIEWER, &body).status, 403);
    assert_eq!(server.handle_sync(ws, OUTSIDER, &body).status, 403);
    assert_eq!(server.handle_version(ws, OUTSIDER).status, 403);
    assert_eq!(server.handle_changes(ws, OUTSIDER, 0, None).status, 403);

    // Rejected syncs leave no trace.
    let version = json(&server.handle_version(ws, OWNER).body);
    assert_eq!(version["version"], 0);
}

#[test]
fn error_statuses() {
    let env = TestEnv::new();
    let server = server(&env);
    let ws = env.workspace_id;

    let response = server.handle_sync(ws, OWNER, b"[1,2");
    assert_eq!(response.status, 400);
    assert_eq!(json(&response.body)["kind"], "validation");

    let response = server.handle_sync(ws, OWNER, b"");
    assert_eq!(response.status, 400);

    let response = server.handle_export(4242, OWNER);
    assert_eq!(response.status, 404);
    assert_eq!(json(&response.body)["kind"], "not_found");

    let bad_image = SnapshotBuilder::new()
        .note(1, "n", None)
        .image_raw(0, 1, "x.png", "%%%")
        .build();
    let response = server.handle_sync(ws, OWNER, &encode(&bad_image).unwrap());
    assert_eq!(response.status, 400);
    assert!(env.image_files(ws).is_empty());
}

#[test]
fn concurrent_syncs_on_one_workspace_serialize() {
    let env = TestEnv::new();
    let server = Arc::new(server(&env));
    let ws = env.workspace_id;

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let server = Arc::clone(&server);
            thread::spawn(move || {
                let request = SnapshotBuilder::new().pin(0, &format!("pin {i}")).build();
                server.handle_sync(ws, OWNER, &encode(&request).unwrap()).status
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 200);
    }

    let version = json(&server.handle_version(ws, OWNER).body);
    assert_eq!(version["version"], 4);
    // Each pass replaced the previous snapshot.
    let export: SyncResponse = serde_json::from_slice(&server.handle_export(ws, OWNER).body).unwrap();
    assert_eq!(export.pinboard_notes.len(), 1);
}
