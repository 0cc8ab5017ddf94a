use super::*;
use crate::net::config::ApiConfig;
use crate::net::testing::{ScriptedTransport, reply};
use crate::net::types::Method;
use serde_json::json;

fn resource(transport: &ScriptedTransport, collection: &'static str) -> Resource<ScriptedTransport> {
    Resource::new(ApiClient::builder(ApiConfig::default(), transport.clone()).build(), collection)
}

#[test]
fn paths_carry_trailing_slashes() {
    assert_eq!(collection_path(USERS), "users/");
    assert_eq!(detail_path(PROJECTS, 42), "projects/42/");
    assert_eq!(action_path(NOTIFICATIONS, 3, "mark_as_read"), "system/notifications/3/mark_as_read/");
    assert_eq!(collection_action_path(USERS, "bulk_delete"), "users/bulk_delete/");
}

#[tokio::test]
async fn list_forwards_query_params() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Get, "risk/alerts/", reply(200, json!({ "results": [] })));

    let body = resource(&transport, RISK_ALERTS)
        .list(&[("level", "high"), ("page", "1")])
        .await
        .unwrap();

    assert_eq!(body, json!({ "results": [] }));
    assert_eq!(
        transport.calls()[0].query,
        vec![("level".to_owned(), "high".to_owned()), ("page".to_owned(), "1".to_owned())]
    );
}

#[tokio::test]
async fn create_and_update_send_json_bodies() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Post, "projects/", reply(201, json!({ "id": 5 })));
    transport.on(Method::Put, "projects/5/", reply(200, json!({ "id": 5, "name": "core" })));
    let projects = resource(&transport, PROJECTS);

    let created = projects.create(&json!({ "name": "core" })).await.unwrap();
    let updated = projects.update(5, &json!({ "name": "core" })).await.unwrap();

    assert_eq!(created["id"], 5);
    assert_eq!(updated["name"], "core");
    assert_eq!(transport.calls()[1].body, Some(json!({ "name": "core" })));
}

#[tokio::test]
async fn bulk_delete_sends_ids_in_body() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Delete, "users/bulk_delete/", reply(200, json!({ "deleted": 2 })));

    let body = resource(&transport, USERS).bulk_delete(&[4, 9]).await.unwrap();

    assert_eq!(body, json!({ "deleted": 2 }));
    assert_eq!(transport.calls()[0].body, Some(json!({ "ids": [4, 9] })));
}

#[tokio::test]
async fn action_posts_to_record_sub_path() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Post, "system/notifications/3/mark_as_read/", reply(200, json!({})));

    resource(&transport, NOTIFICATIONS).action(3, "mark_as_read").await.unwrap();

    assert_eq!(transport.call_count(Method::Post, "system/notifications/3/mark_as_read/"), 1);
}

#[tokio::test]
async fn collection_action_reads_sub_path() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Get, "system/notifications/unread_count/", reply(200, json!({ "count": 4 })));

    let body = resource(&transport, NOTIFICATIONS).collection_action("unread_count").await.unwrap();

    assert_eq!(body["count"], 4);
}

#[tokio::test]
async fn delete_propagates_errors_unchanged() {
    let transport = ScriptedTransport::default();
    transport.on(Method::Delete, "pipelines/8/", reply(403, json!({ "detail": "no permission" })));

    let err = resource(&transport, PIPELINES).delete(8).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.server_message(), Some("no permission"));
}
