//! Administrative endpoints of a running gateway.

mod common;

use common::{client, start_gateway, start_node, test_config, unreachable_url};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn add_node_appends_and_reports_candidates() {
    let gateway = start_gateway(test_config(vec!["http://localhost:9080".into()])).await;

    let res = client()
        .post(gateway.url("/api/add-node"))
        .json(&json!({ "nodeUrl": "http://10.0.0.5:4001" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["added"], "http://10.0.0.5:4001");
    assert_eq!(
        body["knownNodes"],
        json!(["http://localhost:9080", "http://10.0.0.5:4001"])
    );
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let gateway = start_gateway(test_config(vec!["http://localhost:9080".into()])).await;

    let res = client()
        .post(gateway.url("/api/add-node"))
        .json(&json!({ "nodeUrl": "http://localhost:9080" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_or_missing_address_is_rejected() {
    let gateway = start_gateway(test_config(vec![])).await;
    let http = client();

    for payload in [json!({ "nodeUrl": "not a url" }), json!({ "nodeUrl": "" }), json!({})] {
        let res = http
            .post(gateway.url("/api/add-node"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "payload {payload}");
    }

    let res = http
        .post(gateway.url("/api/add-node"))
        .header("content-type", "application/json")
        .body("{broken")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn add_node_requires_token_when_configured() {
    let mut config = test_config(vec![]);
    config.admin.api_key = Some("s3cret".into());
    let gateway = start_gateway(config).await;
    let http = client();
    let payload = json!({ "nodeUrl": "http://localhost:4000" });

    let res = http.post(gateway.url("/api/add-node")).json(&payload).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = http
        .post(gateway.url("/api/add-node"))
        .bearer_auth("wrong")
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = http
        .post(gateway.url("/api/add-node"))
        .bearer_auth("s3cret")
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn node_status_reports_without_probing_unless_refreshed() {
    let dead = unreachable_url().await;
    let node = start_node("a").await;
    let gateway = start_gateway(test_config(vec![dead.clone(), node.url.clone()])).await;
    let http = client();

    let status: Value = http
        .get(gateway.url("/api/node-status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["connected"], false);
    assert_eq!(status["activeNode"], Value::Null);
    assert_eq!(status["knownNodes"], json!([dead, node.url]));

    let status: Value = http
        .get(gateway.url("/api/node-status?refresh=true"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["connected"], true);
    assert_eq!(status["activeNode"], node.url.as_str());
    assert_eq!(status["state"], "active");
    assert_eq!(node.hits(), 0);
}

#[tokio::test]
async fn registered_node_becomes_eligible() {
    let node = start_node("late").await;
    let gateway = start_gateway(test_config(vec![])).await;
    let http = client();

    let res = http.get(gateway.url("/api/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let res = http
        .post(gateway.url("/api/add-node"))
        .json(&json!({ "nodeUrl": node.url }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = http.get(gateway.url("/api/ping")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["node"], "late");
}

#[tokio::test]
async fn unknown_path_is_json_404() {
    let gateway = start_gateway(test_config(vec![])).await;

    let res = client().get(gateway.url("/metrics-or-whatever")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
}
