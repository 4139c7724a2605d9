#![allow(clippy::unwrap_used, clippy::expect_used, clippy::use_debug)]

mod common;

use common::{MANAGEMENT_JSON, SPACE, TOKEN, asset_json, client, client_with_locale, error_json, path};
use contentful_management::{Asset, ContentfulError, File, StatusCode, Sys, UploadFrom, Versioned};
use httpmock::prelude::*;
use serde_json::json;

#[tokio::test]
async fn get_resolves_default_locale() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(path("assets/a1"))
            .header("authorization", format!("Bearer {TOKEN}"));
        then.status(200).json_body(asset_json("a1", 7));
    });

    let asset = client(&server).assets().get(SPACE, "a1").await.unwrap();

    mock.assert();
    assert_eq!(asset.locale.as_str(), "en");
    assert_eq!(asset.fields.title, "Hello");
    assert_eq!(asset.fields.description, "A greeting");
    assert_eq!(asset.fields.file.file_name.as_deref(), Some("hello.png"));
    assert_eq!(
        asset
            .fields
            .file
            .details
            .as_ref()
            .and_then(|d| d.image.as_ref())
            .and_then(|i| i.width),
        Some(10)
    );
    assert_eq!(asset.version(), 7);
}

#[tokio::test]
async fn configured_default_locale_drives_decoding() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("assets/a1"));
        then.status(200).json_body(asset_json("a1", 2));
    });

    let asset = client_with_locale(&server, "fr")
        .assets()
        .get(SPACE, "a1")
        .await
        .unwrap();

    assert_eq!(asset.fields.title, "Bonjour");
    assert_eq!(asset.fields.description, "Une salutation");
    // no "fr" file entry on the server
    assert_eq!(asset.fields.file, File::default());
}

#[tokio::test]
async fn get_localized_overrides_client_locale() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("assets/a1"));
        then.status(200).json_body(asset_json("a1", 2));
    });

    let asset = client(&server)
        .assets()
        .get_localized(SPACE, "a1", "fr".into())
        .await
        .unwrap();
    assert_eq!(asset.fields.title, "Bonjour");
}

#[tokio::test]
async fn upsert_new_asset_posts_locale_maps() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(path("assets"))
            .header("content-type", MANAGEMENT_JSON)
            .header("x-contentful-version", "1")
            .json_body(json!({
                "fields": {
                    "title": {"fr": "Bonjour"},
                    "description": {"fr": ""},
                    "file": {"fr": {
                        "fileName": "chat.png",
                        "uploadFrom": {"sys": {"type": "Link", "linkType": "Upload", "id": "up1"}}
                    }}
                }
            }));
        then.status(201).json_body(json!({
            "sys": {"id": "new1", "version": 1, "createdAt": "2024-05-01T09:00:00Z"},
            "fields": {
                "title": {"fr": "Bonjour"},
                "file": {"fr": {"fileName": "chat.png"}}
            }
        }));
    });

    let mut asset = Asset::new("fr");
    asset.fields.title = "Bonjour".to_owned();
    asset.fields.file.file_name = Some("chat.png".to_owned());
    asset.fields.file.upload_from = Some(UploadFrom::resource("up1"));

    client(&server).assets().upsert(SPACE, &mut asset).await.unwrap();

    mock.assert();
    assert_eq!(asset.id(), Some("new1"));
    assert_eq!(asset.locale.as_str(), "fr");
    assert_eq!(asset.fields.title, "Bonjour");
    assert!(asset.fields.file.upload_from.is_none());
}

#[tokio::test]
async fn upsert_existing_asset_puts_with_version() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("assets/a1"));
        then.status(200).json_body(asset_json("a1", 3));
    });
    let put = server.mock(|when, then| {
        when.method(PUT)
            .path(path("assets/a1"))
            .header("x-contentful-version", "3");
        then.status(200).json_body(asset_json("a1", 4));
    });

    let client = client(&server);
    let mut asset = client.assets().get(SPACE, "a1").await.unwrap();
    asset.fields.title = "Hello again".to_owned();
    client.assets().upsert(SPACE, &mut asset).await.unwrap();

    put.assert();
    assert_eq!(asset.version(), 4);
}

#[tokio::test]
async fn publish_then_unpublish_carry_refreshed_versions() {
    let server = MockServer::start();
    let publish = server.mock(|when, then| {
        when.method(PUT)
            .path(path("assets/a1/published"))
            .header("x-contentful-version", "4");
        then.status(200).json_body(asset_json("a1", 5));
    });
    let unpublish = server.mock(|when, then| {
        when.method(DELETE)
            .path(path("assets/a1/published"))
            .header("x-contentful-version", "5");
        then.status(200).json_body(asset_json("a1", 6));
    });

    let client = client(&server);
    let mut asset = Asset::from_json(&serde_json::to_vec(&asset_json("a1", 4)).unwrap(), "en").unwrap();

    client.assets().publish(SPACE, &mut asset).await.unwrap();
    assert_eq!(asset.version(), 5);
    client.assets().unpublish(SPACE, &mut asset).await.unwrap();
    assert_eq!(asset.version(), 6);

    publish.assert();
    unpublish.assert();
}

#[tokio::test]
async fn process_targets_the_asset_locale() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path(path("assets/a1/files/en-US/process"))
            .header("x-contentful-version", "2");
        then.status(204);
    });

    let asset = Asset {
        sys: Some(Sys {
            version: Some(2),
            ..Sys::with_id("a1")
        }),
        ..Asset::new("en-US")
    };
    client(&server).assets().process(SPACE, &asset).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn delete_sends_version() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path(path("assets/a1"))
            .header("x-contentful-version", "9");
        then.status(204);
    });

    let asset = Asset {
        sys: Some(Sys {
            version: Some(9),
            ..Sys::with_id("a1")
        }),
        ..Asset::default()
    };
    client(&server).assets().delete(SPACE, &asset).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn stale_version_is_a_conflict() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT).path(path("assets/a1/published"));
        then.status(409)
            .header("content-type", MANAGEMENT_JSON)
            .json_body(error_json("VersionMismatch", "Version mismatch error"));
    });

    let mut asset = Asset {
        sys: Some(Sys {
            version: Some(1),
            ..Sys::with_id("a1")
        }),
        ..Asset::default()
    };
    let err = client(&server)
        .assets()
        .publish(SPACE, &mut asset)
        .await
        .unwrap_err();

    // exactly one attempt
    assert_eq!(mock.calls(), 1);
    assert!(err.is_version_conflict());
    assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    // the caller's asset is untouched
    assert_eq!(asset.version(), 1);
}

#[tokio::test]
async fn api_errors_carry_the_envelope() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("assets/missing"));
        then.status(404)
            .json_body(error_json("NotFound", "The resource could not be found."));
    });

    let err = client(&server)
        .assets()
        .get(SPACE, "missing")
        .await
        .unwrap_err();

    let ContentfulError::Api(api) = err else {
        panic!("expected Api error, got {err:?}");
    };
    assert_eq!(api.status, StatusCode::NOT_FOUND);
    assert_eq!(api.code.as_deref(), Some("NotFound"));
    assert_eq!(api.request_id.as_deref(), Some("req-123"));
}

#[tokio::test]
async fn malformed_file_is_a_decode_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(path("assets/bad"));
        then.status(200)
            .json_body(json!({"sys": {"id": "bad"}, "fields": {"file": {"en": 42}}}));
    });

    let err = client(&server).assets().get(SPACE, "bad").await.unwrap_err();
    assert!(matches!(err, ContentfulError::Decode(_)));
}

#[tokio::test]
async fn mutation_without_id_sends_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT);
        then.status(500);
    });

    let mut asset = Asset::default();
    let err = client(&server)
        .assets()
        .publish(SPACE, &mut asset)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ContentfulError::MissingSys {
            entity: "asset",
            field: "id"
        }
    ));
    assert_eq!(mock.calls(), 0);
}
