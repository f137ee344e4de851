//! Plain forwarding of everything that is not translated.

use axum::http::Method;
use rest_adapter::AdapterConfig;
use url::Url;

mod common;

use common::{client, start_adapter, start_adapter_with, start_backend, MockResponse};

#[tokio::test]
async fn test_get_is_forwarded_unchanged() {
    let backend = start_backend(|_| {
        MockResponse::json(200, r#"{"data":[],"hasNext":false}"#).with_header("x-total", "0")
    })
    .await;
    let adapter = start_adapter(backend.base_url()).await;

    let res = client()
        .get(adapter.url("/api/tenant/devices?pageSize=10&page=0"))
        .header("x-authorization", "Bearer jwt")
        .header("accept", "application/json")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(res.headers()["x-total"], "0");
    assert_eq!(res.text().await.unwrap(), r#"{"data":[],"hasNext":false}"#);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    let forwarded = &requests[0];
    assert_eq!(forwarded.method, Method::GET);
    assert_eq!(forwarded.path, "/api/tenant/devices");
    assert_eq!(forwarded.query.as_deref(), Some("pageSize=10&page=0"));
    assert_eq!(forwarded.headers["x-authorization"], "Bearer jwt");
    assert_eq!(forwarded.headers["accept"], "application/json");
    assert_eq!(forwarded.headers["host"], backend.addr.to_string().as_str());
}

#[tokio::test]
async fn test_post_elsewhere_is_forwarded_byte_for_byte() {
    let backend = start_backend(|_| MockResponse::text(201, "created")).await;
    let adapter = start_adapter(backend.base_url()).await;

    let body = "username=alice&password=secret";
    let res = client()
        .post(adapter.url("/api/device"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body(body)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 201);
    assert_eq!(res.text().await.unwrap(), "created");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[0].path, "/api/device");
    assert_eq!(requests[0].body_text(), body);
    assert_eq!(
        requests[0].headers["content-type"],
        "application/x-www-form-urlencoded"
    );
}

#[tokio::test]
async fn test_backend_errors_are_relayed() {
    let backend = start_backend(|_| MockResponse::text(503, "maintenance")).await;
    let adapter = start_adapter(backend.base_url()).await;

    for method in [Method::GET, Method::DELETE, Method::PATCH] {
        let res = client()
            .request(method.clone(), adapter.url("/api/device/1"))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status().as_u16(), 503, "method {}", method);
        assert_eq!(res.text().await.unwrap(), "maintenance");
    }

    let methods: Vec<Method> = backend.requests().into_iter().map(|r| r.method).collect();
    assert_eq!(methods, vec![Method::GET, Method::DELETE, Method::PATCH]);
}

#[tokio::test]
async fn test_login_path_other_methods_pass_through() {
    let backend = start_backend(|_| MockResponse::text(405, "")).await;
    let adapter = start_adapter(backend.base_url()).await;

    let res = client()
        .get(adapter.url("/api/auth/login?username=alice"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 405);
    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::GET);
    assert_eq!(requests[0].query.as_deref(), Some("username=alice"));
}

#[tokio::test]
async fn test_base_path_is_prefixed() {
    let backend = start_backend(|_| MockResponse::text(200, "ok")).await;
    let base = Url::parse(&format!("http://{}/tb", backend.addr)).unwrap();
    let adapter = start_adapter_with(AdapterConfig::new(base)).await;

    let res = client().get(adapter.url("/api/noauth/health")).send().await.unwrap();

    assert_eq!(res.status().as_u16(), 200);
    assert_eq!(backend.requests()[0].path, "/tb/api/noauth/health");
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let unused = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = unused.local_addr().unwrap();
    drop(unused);

    let adapter = start_adapter(Url::parse(&format!("http://{}", addr)).unwrap()).await;

    let res = client().get(adapter.url("/api/devices")).send().await.unwrap();
    assert_eq!(res.status().as_u16(), 502);
}
