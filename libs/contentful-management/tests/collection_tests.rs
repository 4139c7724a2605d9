#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

mod common;

use common::{SPACE, asset_json, client, client_with_locale, path};
use contentful_management::{Query, StatusCode};
use futures::TryStreamExt;
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn no_request_until_advanced() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(path("assets"));
        then.status(200).json_body(json!({"total": 0, "items": []}));
    });

    let client = client(&server);
    let collection = client.assets().list(SPACE);
    assert_eq!(mock.calls(), 0);
    drop(collection);
    assert_eq!(mock.calls(), 0);
}

#[tokio::test]
async fn pages_advance_skip_until_total() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path(path("assets"))
            .query_param("limit", "2")
            .query_param("skip", "0");
        then.status(200).json_body(json!({
            "sys": {"type": "Array"},
            "total": 3, "skip": 0, "limit": 2,
            "items": [asset_json("a1", 1), asset_json("a2", 1)]
        }));
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path(path("assets"))
            .query_param("limit", "2")
            .query_param("skip", "2");
        then.status(200).json_body(json!({
            "sys": {"type": "Array"},
            "total": 3, "skip": 2, "limit": 2,
            "items": [asset_json("a3", 1)]
        }));
    });

    let client = client_with_locale(&server, "fr");
    let mut assets = client.assets().list(SPACE).with_query(Query::new().limit(2));

    let page = assets.next().await.unwrap().unwrap();
    assert_eq!(page.total, 3);
    let decoded = page.to_assets().unwrap();
    assert_eq!(decoded.len(), 2);
    assert_eq!(decoded[0].fields.title, "Bonjour");

    let page = assets.next().await.unwrap().unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(assets.query().skip, 3);

    assert!(assets.next().await.unwrap().is_none());
    assert!(assets.next().await.unwrap().is_none());

    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 1);
}

#[tokio::test]
async fn empty_page_ends_the_collection() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(path("entries"));
        then.status(200).json_body(json!({"total": 10, "skip": 0, "limit": 100, "items": []}));
    });

    let mut entries = client(&server).entries().list(SPACE);
    assert!(entries.next().await.unwrap().is_none());
    assert!(entries.next().await.unwrap().is_none());
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn failed_page_can_be_retried_by_the_caller() {
    let server = MockServer::start();
    let mut failing = server.mock(|when, then| {
        when.method(GET).path(path("assets")).query_param("skip", "0");
        then.status(503).body("unavailable");
    });

    let client = client(&server);
    let mut assets = client.assets().list(SPACE);
    let err = assets.next().await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    assert_eq!(assets.query().skip, 0);

    failing.delete();
    server.mock(|when, then| {
        when.method(GET).path(path("assets")).query_param("skip", "0");
        then.status(200).json_body(json!({"total": 1, "items": [asset_json("a1", 1)]}));
    });
    assert!(assets.next().await.unwrap().is_some());
    failing = server.mock(|when, then| {
        when.method(GET).path(path("assets")).query_param("skip", "1");
        then.status(500);
    });
    assert!(assets.next().await.unwrap().is_none());
    assert_eq!(failing.calls(), 0);
}

#[tokio::test]
async fn stream_yields_items_across_pages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("content_types")).query_param("skip", "0");
        then.status(200).json_body(json!({
            "total": 3,
            "items": [{"sys": {"id": "ct1"}}, {"sys": {"id": "ct2"}}]
        }));
    });
    server.mock(|when, then| {
        when.method(GET).path(path("content_types")).query_param("skip", "2");
        then.status(200).json_body(json!({"total": 3, "items": [{"sys": {"id": "ct3"}}]}));
    });

    let items: Vec<serde_json::Value> = client(&server)
        .content_types()
        .list(SPACE)
        .into_stream()
        .try_collect()
        .await
        .unwrap();

    let ids: Vec<_> = items.iter().map(|i| i["sys"]["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["ct1", "ct2", "ct3"]);
}

#[tokio::test]
async fn stream_surfaces_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("entries"));
        then.status(401)
            .json_body(json!({"sys": {"type": "Error", "id": "AccessTokenInvalid"}, "message": "bad token"}));
    });

    let result: Result<Vec<serde_json::Value>, _> = client(&server)
        .entries()
        .list(SPACE)
        .into_stream()
        .try_collect()
        .await;
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
}
