use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use flashdeck::handlers::router;
use flashdeck::state::AppState;

fn server() -> (TestServer, TempDir) {
    let temp = TempDir::new().unwrap();
    let app = router(AppState::new(temp.path().to_path_buf()));
    (TestServer::new(app).unwrap(), temp)
}

fn spanish_set() -> Value {
    json!({
        "score": 0,
        "last_scores": [],
        "cards": [
            {"question": ["one"], "answer": ["uno"], "behavior": "or"},
            {"question": ["two"], "answer": ["dos"], "behavior": "or"},
            {"question": ["three"], "answer": ["tres"], "behavior": "or", "note": "número"}
        ]
    })
}

async fn submit(server: &TestServer, id: &str, answer: &str) -> Value {
    let response = server
        .post(&format!("/study/{}/answer", id))
        .json(&json!({ "answer": answer }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

#[tokio::test]
async fn test_save_list_and_load_set() {
    let (server, _temp) = server();

    let saved = server.put("/sets/spanish").json(&spanish_set()).await;
    saved.assert_status_ok();
    assert_eq!(saved.json::<Value>()["name"], "spanish.json");

    let listed = server.get("/sets").await.json::<Value>();
    assert_eq!(listed, json!([{"name": "spanish.json", "format": "structured"}]));

    let loaded = server.get("/sets/spanish.json").await.json::<Value>();
    assert_eq!(loaded["format"], "structured");
    assert_eq!(loaded["set"]["cards"][2]["note"], "número");
}

#[tokio::test]
async fn test_missing_set_is_not_found() {
    let (server, _temp) = server();
    server.get("/sets/nope.json").await.assert_status(StatusCode::NOT_FOUND);
    server
        .post("/study")
        .json(&json!({"set": "nope.json"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_empty_set_is_rejected() {
    let (server, _temp) = server();
    let response = server
        .put("/sets/empty")
        .json(&json!({"score": 0, "last_scores": [], "cards": []}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Cannot save an empty set");
}

#[tokio::test]
async fn test_card_authoring() {
    let (server, _temp) = server();

    // Adding to a set that does not exist yet creates it
    let added = server
        .post("/sets/animals/cards")
        .json(&json!({"question": "cat, kitty", "answer": "gato, minino", "behavior": "or"}))
        .await;
    added.assert_status_ok();
    assert_eq!(added.json::<Value>(), json!({"index": 0, "cards": 1}));

    server
        .post("/sets/animals/cards")
        .json(&json!({"question": "dog", "answer": "perro"}))
        .await
        .assert_status_ok();

    let blank = server
        .post("/sets/animals/cards")
        .json(&json!({"question": "  ", "answer": "x"}))
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);

    server
        .put("/sets/animals.json/cards/1")
        .json(&json!({"question": "dog", "answer": "perro, can", "behavior": "and"}))
        .await
        .assert_status_ok();

    let set = server.get("/sets/animals.json").await.json::<Value>();
    assert_eq!(set["set"]["cards"][0]["question"], json!(["cat", "kitty"]));
    assert_eq!(set["set"]["cards"][1]["answer"], json!(["perro", "can"]));
    assert_eq!(set["set"]["cards"][1]["behavior"], "and");

    let deleted = server.delete("/sets/animals.json/cards/0").await;
    assert_eq!(deleted.json::<Value>()["cards"], 1);

    server
        .delete("/sets/animals.json/cards/7")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validate_reports_malformed_cards() {
    let (server, temp) = server();
    std::fs::write(
        temp.path().join("broken.json"),
        r#"{"score": 0, "last_scores": [], "cards": [
            {"question": ["ok"], "answer": ["fine"]},
            {"question": [""], "answer": ["x"]}
        ]}"#,
    )
    .unwrap();

    let report = server.get("/sets/broken.json/validate").await.json::<Value>();
    assert_eq!(report["malformed"], json!([{"index": 1, "problem": "missing_question"}]));
}

#[tokio::test]
async fn test_card_without_question_is_skipped_not_fatal() {
    let (server, temp) = server();
    std::fs::write(
        temp.path().join("partial.json"),
        r#"{"cards": [
            {"answer": ["x"]},
            {"question": ["one"], "answer": ["uno"], "behavior": "OR"}
        ]}"#,
    )
    .unwrap();

    server.get("/sets/partial.json").await.assert_status_ok();

    let report = server.get("/sets/partial.json/validate").await.json::<Value>();
    assert_eq!(report["malformed"], json!([{"index": 0, "problem": "missing_question"}]));

    let started = server.post("/study").json(&json!({"set": "partial.json"})).await;
    started.assert_status(StatusCode::CREATED);
    let started = started.json::<Value>();
    assert_eq!(started["card"]["prompt"], "one");
    assert_eq!(started["progress"]["deck_size"], 1);

    let id = started["session_id"].as_str().unwrap().to_string();
    let done = submit(&server, &id, "UNO").await;
    assert_eq!(done["session"]["status"], "complete");
}

#[tokio::test]
async fn test_grade_endpoint() {
    let (server, _temp) = server();

    let response = server
        .post("/grade")
        .json(&json!({"input": "El sol y la LUZ", "expression": "sol&luz"}))
        .await;
    assert_eq!(response.json::<Value>(), json!({"correct": true}));

    let response = server
        .post("/grade")
        .json(&json!({"input": "hola amigo", "answers": ["hola"], "behavior": "or"}))
        .await;
    assert_eq!(response.json::<Value>(), json!({"correct": false}));

    server
        .post("/grade")
        .json(&json!({"input": "x"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_study_session_with_requeue_and_score() {
    let (server, _temp) = server();
    server.put("/sets/spanish").json(&spanish_set()).await.assert_status_ok();

    let started = server.post("/study").json(&json!({"set": "spanish"})).await;
    started.assert_status(StatusCode::CREATED);
    let started = started.json::<Value>();
    let id = started["session_id"].as_str().unwrap().to_string();
    assert_eq!(started["card"]["prompt"], "one");
    assert_eq!(started["status"], "active");

    // Hint ladder on card one
    let first = submit(&server, &id, "nope").await;
    assert_eq!(first["outcome"], json!({"result": "hint", "text": "u__"}));
    let second = submit(&server, &id, "nope").await;
    assert_eq!(second["feedback"], "Incorrect. Correct Answer: uno");
    let third = submit(&server, &id, "nope").await;
    assert_eq!(third["outcome"]["result"], "forced_advance");
    assert_eq!(third["session"]["card"]["prompt"], "two");

    submit(&server, &id, "DOS").await;
    let three = server.get(&format!("/study/{}", id)).await.json::<Value>();
    assert_eq!(three["note_line"], "Note: número");
    submit(&server, &id, "tres").await;

    // Card one comes back from the re-queue
    let view = server.get(&format!("/study/{}", id)).await.json::<Value>();
    assert_eq!(view["card"]["prompt"], "one");
    assert_eq!(view["progress"]["pending"], 0);

    let done = submit(&server, &id, "uno").await;
    assert_eq!(done["session"]["status"], "complete");
    assert_eq!(done["feedback"], "Correct! You have completed the session!");

    let again = submit(&server, &id, "uno").await;
    assert_eq!(again["outcome"], json!({"result": "already_complete"}));

    // Score written back to the set
    let set = server.get("/sets/spanish.json").await.json::<Value>();
    assert_eq!(set["set"]["score"], 2);
    assert_eq!(set["set"]["last_scores"], json!([2]));
}

#[tokio::test]
async fn test_study_text_deck() {
    let (server, _temp) = server();
    let saved = server
        .put("/sets/words.txt/raw")
        .text("cat : gato|minino\n# comment\nsun: sol&luz\n")
        .await;
    saved.assert_status_ok();
    assert_eq!(saved.json::<Value>()["entries"].as_array().unwrap().len(), 2);

    let started = server.post("/study").json(&json!({"set": "words.txt"})).await.json::<Value>();
    let id = started["session_id"].as_str().unwrap().to_string();

    assert_eq!(submit(&server, &id, "gato").await["outcome"]["result"], "correct");
    assert_eq!(submit(&server, &id, "sol").await["outcome"]["result"], "hint");
    let done = submit(&server, &id, "el sol y la luz").await;
    assert_eq!(done["session"]["status"], "complete");
}

#[tokio::test]
async fn test_empty_deck_does_not_start() {
    let (server, _temp) = server();
    server.put("/sets/empty.txt/raw").text("# only comments\n").await.assert_status_ok();

    server
        .post("/study")
        .json(&json!({"set": "empty.txt"}))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_abandon_session() {
    let (server, _temp) = server();
    server.put("/sets/words.txt/raw").text("a : b\n").await;
    let started = server.post("/study").json(&json!({"set": "words.txt"})).await.json::<Value>();
    let id = started["session_id"].as_str().unwrap().to_string();

    server.delete(&format!("/study/{}", id)).await.assert_status(StatusCode::NO_CONTENT);
    server.get(&format!("/study/{}", id)).await.assert_status(StatusCode::NOT_FOUND);
    server.delete(&format!("/study/{}", id)).await.assert_status(StatusCode::NOT_FOUND);
}
