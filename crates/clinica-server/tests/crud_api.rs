use clinica_server::{AppConfig, AppState, build_app};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

async fn start_server() -> (String, tokio::sync::oneshot::Sender<()>, JoinHandle<()>) {
    let store = clinica_db_memory::create_document_store();
    let app = build_app(&AppConfig::default(), AppState::new(store));

    // Bind to an ephemeral port
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = rx.await;
            })
            .await;
    });

    (format!("http://{addr}"), tx, server)
}

async fn stop_server(tx: tokio::sync::oneshot::Sender<()>, handle: JoinHandle<()>) {
    let _ = tx.send(());
    let _ = handle.await;
}

fn checkup() -> Value {
    json!({
        "scheduledAt": "2025-07-25T10:00:00",
        "reason": "Check-up",
        "doctorId": 101,
        "patientId": 201,
        "status": "Scheduled",
    })
}

fn record(id: i64) -> Value {
    json!({
        "id": id,
        "createdAt": "2025-06-01 08:00:00",
        "medicalHistory": "No known allergies",
        "diagnosis": "Seasonal flu",
        "patientId": 201,
        "treatment": "Rest and fluids",
        "exams": [{"name": "X-Ray", "performedAt": "2025-06-01T08:30:00"}],
    })
}

#[tokio::test]
async fn consulta_crud_round_trip() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(format!("{base}/consultas"))
        .json(&checkup())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(
        created,
        json!({
            "id": 1,
            "scheduledAt": "2025-07-25 10:00:00",
            "reason": "Check-up",
            "doctorId": 101,
            "patientId": 201,
            "status": "Scheduled",
        })
    );

    // Read
    let res = client.get(format!("{base}/consultas/1")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), created);

    // Partial update responds with the re-read entity
    let res = client
        .put(format!("{base}/consultas/1"))
        .json(&json!({"status": "Completed"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["status"], "Completed");
    assert_eq!(updated["reason"], "Check-up");

    // List
    let res = client.get(format!("{base}/consultas")).send().await.unwrap();
    let list: Value = res.json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Delete, then the id is gone
    let res = client
        .delete(format!("{base}/consultas/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].is_string());

    let res = client.get(format!("{base}/consultas/1")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let res = client
        .delete(format!("{base}/consultas/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn consulta_identifiers_fill_gaps() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let created: Value = client
            .post(format!("{base}/consultas"))
            .json(&checkup())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(created["id"].as_i64().unwrap());
    }
    assert_eq!(ids, vec![1, 2]);

    client
        .delete(format!("{base}/consultas/1"))
        .send()
        .await
        .unwrap();
    let third: Value = client
        .post(format!("{base}/consultas"))
        .json(&checkup())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(third["id"], 1);

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn consulta_validation_errors() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    // Reason too short carries the offending field
    let mut payload = checkup();
    payload["reason"] = json!("ab");
    let res = client
        .post(format!("{base}/consultas"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "reason");

    // Unknown status value
    let mut payload = checkup();
    payload["status"] = json!("Done");
    let res = client
        .post(format!("{base}/consultas"))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    assert!(res.json::<Value>().await.unwrap()["error"].is_string());

    // Years with no RFC 3339 form are rejected up front, never stored
    for scheduled_at in ["-0001-01-01T00:00:00", "0000-01-01T00:30:00+01:00"] {
        let mut payload = checkup();
        payload["scheduledAt"] = json!(scheduled_at);
        let res = client
            .post(format!("{base}/consultas"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400, "{scheduled_at}");
    }
    let res = client.get(format!("{base}/consultas")).send().await.unwrap();
    assert_eq!(res.json::<Value>().await.unwrap(), json!([]));

    // Missing field
    let res = client
        .post(format!("{base}/consultas"))
        .json(&json!({"reason": "Check-up"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    // Update of an absent id
    let res = client
        .put(format!("{base}/consultas/42"))
        .json(&json!({"status": "Cancelled"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn legacy_status_values_are_accepted() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let mut payload = checkup();
    payload["status"] = json!("Agendada");
    let created: Value = client
        .post(format!("{base}/consultas"))
        .json(&payload)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["status"], "Scheduled");

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn prontuario_crud_and_exam_replacement() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{base}/prontuarios"))
        .json(&record(5))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["id"], 5);
    assert_eq!(created["createdAt"], "2025-06-01 08:00:00");
    assert_eq!(
        created["exams"],
        json!([{"name": "X-Ray", "performedAt": "2025-06-01 08:30:00"}])
    );

    // Same identifier again is a conflict
    let res = client
        .post(format!("{base}/prontuarios"))
        .json(&record(5))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 409);

    // Updating exams with an empty list clears them; other fields stay
    let res = client
        .put(format!("{base}/prontuarios/5"))
        .json(&json!({"exams": []}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let updated: Value = res.json().await.unwrap();
    assert_eq!(updated["exams"], json!([]));
    assert_eq!(updated["treatment"], "Rest and fluids");

    // Delete
    let res = client
        .delete(format!("{base}/prontuarios/5"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let res = client
        .get(format!("{base}/prontuarios/5"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn prontuario_exam_endpoints() {
    let (base, tx, handle) = start_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/prontuarios"))
        .json(&record(7))
        .send()
        .await
        .unwrap();

    let res = client
        .post(format!("{base}/prontuarios/7/exams"))
        .json(&json!({"name": "MRI", "performedAt": "2025-06-02T09:00:00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["exams"].as_array().unwrap().len(), 2);
    assert_eq!(body["exams"][1]["name"], "MRI");

    // Exam name too short
    let res = client
        .post(format!("{base}/prontuarios/7/exams"))
        .json(&json!({"name": "M", "performedAt": "2025-06-02T09:00:00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .delete(format!("{base}/prontuarios/7/exams/X-Ray"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["exams"], json!([{"name": "MRI", "performedAt": "2025-06-02 09:00:00"}]));

    let res = client
        .post(format!("{base}/prontuarios/8/exams"))
        .json(&json!({"name": "MRI", "performedAt": "2025-06-02T09:00:00"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    stop_server(tx, handle).await;
}

#[tokio::test]
async fn healthz_reports_backend() {
    let (base, tx, handle) = start_server().await;

    let body: Value = reqwest::get(format!("{base}/healthz"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["backend"], "in-memory-papaya");

    stop_server(tx, handle).await;
}
