#![allow(dead_code)]

use contentful_management::Client;
use httpmock::MockServer;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;
use url::Url;

pub const SPACE: &str = "s1";
pub const TOKEN: &str = "CFPAT-test-token";
pub const MANAGEMENT_JSON: &str = "application/vnd.contentful.management.v1+json";

/// Client pointing both endpoints at the mock server.
pub fn client(server: &MockServer) -> Client {
    client_with_locale(server, "en")
}

/// Route SDK logs through the test harness; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn client_with_locale(server: &MockServer, locale: &str) -> Client {
    init_tracing();
    let base = Url::parse(&server.base_url()).unwrap();
    Client::builder(TOKEN)
        .base_url(base.clone())
        .upload_url(base)
        .default_locale(locale)
        .allow_insecure_http()
        .build()
        .unwrap()
}

pub fn path(rest: &str) -> String {
    format!("/spaces/{SPACE}/{rest}")
}

pub fn asset_json(id: &str, version: u64) -> Value {
    json!({
        "sys": {
            "id": id,
            "type": "Asset",
            "version": version,
            "createdAt": "2024-05-01T09:00:00Z",
            "updatedAt": "2024-05-02T09:00:00Z",
            "space": {"sys": {"type": "Link", "linkType": "Space", "id": SPACE}}
        },
        "fields": {
            "title": {"en": "Hello", "fr": "Bonjour"},
            "description": {"en": "A greeting", "fr": "Une salutation"},
            "file": {
                "en": {
                    "fileName": "hello.png",
                    "contentType": "image/png",
                    "url": "//images.ctfassets.net/hello.png",
                    "details": {"size": 1024, "image": {"width": 10, "height": 20}}
                }
            }
        }
    })
}

pub fn entry_json(id: &str, version: u64) -> Value {
    json!({
        "sys": {
            "id": id,
            "type": "Entry",
            "version": version,
            "space": {"sys": {"type": "Link", "linkType": "Space", "id": SPACE}},
            "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": "post"}}
        },
        "fields": {
            "title": {"en": "Hello", "fr": "Bonjour"},
            "views": {"en": 10}
        }
    })
}

pub fn error_json(code: &str, message: &str) -> Value {
    json!({
        "sys": {"type": "Error", "id": code},
        "message": message,
        "requestId": "req-123"
    })
}
