use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use timetable_solver::config::EngineConfig;
use timetable_solver::server::router;
use tower::ServiceExt;

async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
    let app = router(EngineConfig::default());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::String(
        String::from_utf8_lossy(&bytes).into_owned(),
    ));
    (status, value)
}

fn request_body(seed: u64) -> Value {
    json!({
        "courses": [
            {
                "id": 1, "code": "CS101", "credits": 3, "capacity": 30,
                "instructorId": 1, "departmentId": 1
            },
            {
                "id": 2, "code": "CS102", "credits": 4, "capacity": 30,
                "instructorId": 1, "departmentId": 1
            }
        ],
        "instructors": [{"id": 1, "name": "Hopper"}],
        "classrooms": [{"id": 5, "capacity": 35}],
        "constraints": [
            {"type": "course_conflict", "entityId": 1, "day": "", "timeSlot": "2"},
            {
                "type": "instructor_unavailable", "entityId": 1,
                "day": "Mon", "timeSlot": "08:00 - 09:00"
            },
            {"type": "course_conflict", "entityId": 2, "day": "", "timeSlot": "40"}
        ],
        "timetableId": 4,
        "grid": {
            "days": ["Mon", "Tue", "Wed"],
            "timeSlots": ["08:00-09:00", "09:00-10:00", "10:00-11:00"]
        },
        "seed": seed
    })
}

#[tokio::test]
async fn generate_endpoint_returns_rows_and_seed() {
    let (status, body) = post("/v1/timetable/generate", request_body(99)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seed"], 99);
    assert_eq!(body["diagnostics"], json!([]));
    let rows = body["scheduledClasses"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    for row in rows {
        assert_eq!(row["id"], 0);
        assert_eq!(row["timetableId"], 4);
        assert_eq!(row["classroomId"], 5);
        assert!(!(row["day"] == "Mon" && row["startTime"] == "08:00"));
    }
}

#[tokio::test]
async fn conflict_with_course_outside_the_run_is_reported() {
    let (status, body) = post("/v1/timetable/generate", request_body(11)).await;
    assert_eq!(status, StatusCode::OK);
    let ignored = body["ignoredConstraints"].as_array().unwrap();
    assert_eq!(ignored.len(), 1);
    assert_eq!(ignored[0]["constraint"]["entityId"], 2);
    assert_eq!(ignored[0]["constraint"]["timeSlot"], "40");
    assert_eq!(ignored[0]["reason"], json!({"kind": "unknown_course", "value": 40}));
}

#[tokio::test]
async fn generate_endpoint_is_reproducible_with_seed() {
    let (_, first) = post("/v1/timetable/generate", request_body(7)).await;
    let (_, second) = post("/v1/timetable/generate", request_body(7)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn malformed_conflict_id_is_bad_request() {
    let mut body = request_body(1);
    body["constraints"][0]["timeSlot"] = json!("not-a-number");
    let (status, body) = post("/v1/timetable/generate", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.as_str().unwrap().contains("non-numeric"));
}

#[tokio::test]
async fn audit_endpoint_reports_instructor_conflict() {
    let row = |course: u32, room: u32| {
        json!({
            "id": 0, "courseId": course, "instructorId": 3, "classroomId": room,
            "day": "Friday", "startTime": "13:00", "endTime": "14:00", "timetableId": 1
        })
    };
    let (status, body) = post(
        "/v1/timetable/audit",
        json!({"scheduledClasses": [row(1, 1), row(2, 2)]}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let groups = body["instructorConflicts"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["entityId"], 3);
    assert_eq!(groups[0]["rows"].as_array().unwrap().len(), 2);
    assert_eq!(body["classroomConflicts"], json!([]));
    assert_eq!(body["studentConflicts"], json!([]));
    assert_eq!(body["notes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn check_endpoint_audits_generated_schedule() {
    let (status, body) = post("/v1/timetable/check", request_body(3)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["seed"], 3);
    assert_eq!(body["audit"]["instructorConflicts"], json!([]));
    assert_eq!(body["audit"]["classroomConflicts"], json!([]));
}
