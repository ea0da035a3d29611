/*!
 * HTTP endpoint tests against an in-process server
 */

use std::sync::Arc;

use vocabatch::database::Repository;
use vocabatch::providers::MockTranslator;
use vocabatch::server::{build_router, ServerState};

use crate::common::{build_service, seeded_repository};

async fn spawn_server(repo: Repository, cards_per_run: usize) -> String {
    let service = build_service(repo.clone(), Arc::new(MockTranslator::working()), cards_per_run);
    let app = build_router(Arc::new(ServerState { service, repo }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_server_shouldAnswerHealthCheck() {
    let repo = seeded_repository(&[]).await.unwrap();
    let base = spawn_server(repo, 10).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    // CORS headers apply to every response, not just preflights
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_server_shouldDriveJobThroughCursorChaining() {
    let repo = seeded_repository(&[("c1", "one"), ("c2", "two"), ("c3", "three")])
        .await
        .unwrap();
    let base = spawn_server(repo.clone(), 2).await;
    let client = reqwest::Client::new();

    let mut cursor = serde_json::Value::Null;
    let mut rounds = 0;

    // Act like the external scheduler: call, read continueFrom, call again
    loop {
        let mut body = serde_json::json!({ "languages": ["fr"] });
        if !cursor.is_null() {
            body["continueFrom"] = cursor.clone();
        }

        let response: serde_json::Value = client
            .post(format!("{}/v1/batch-translate", base))
            .json(&body)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(response["success"], true);
        rounds += 1;
        assert!(rounds <= 5, "cursor failed to advance");

        if response["completed"] == true || response["hasMore"] == false {
            break;
        }
        cursor = response["continueFrom"].clone();
    }

    assert_eq!(rounds, 2);
    assert_eq!(repo.count_translations().await.unwrap(), 3);

    // One more call reports completion
    let response: serde_json::Value = client
        .post(format!("{}/v1/batch-translate", base))
        .json(&serde_json::json!({ "languages": ["fr"], "continueFrom": "c3" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["completed"], true);
    assert_eq!(response["message"], "No more cards to translate");
}
