use crate::fixtures::test_app::TestApp;
use ohcr_transcription::TranscriptFormat;
use serde_json::Value;

const LESSON_SRT: &str = "\
1
00:00:00,000 --> 00:00:02,000
Welcome everyone, today we observe a falling ball.

2
00:00:03,000 --> 00:00:04,000
Maybe the heavy one is faster

3
00:00:05,000 --> 00:00:07,000
But does that hold if we drop a feather in a vacuum?

4
00:00:08,000 --> 00:00:09,500
Open your notebooks please and write this down now

5
00:00:10,500 --> 00:00:13,000
So therefore we can say both fall at the same rate in a vacuum.

6
00:00:14,000 --> 00:00:15,000
I think we can apply it
";

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.ogg", Some(("lesson.srt", LESSON_SRT))).await;

    assert_eq!(resp.status().as_u16(), 400);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_request");
}

#[tokio::test]
async fn upload_rejects_unknown_transcript_type() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.wav", Some(("notes.docx", "hello"))).await;

    assert_eq!(resp.status().as_u16(), 400);
}

#[tokio::test]
async fn upload_then_fetch_results() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.mp3", Some(("lesson.srt", LESSON_SRT))).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();

    let session_id = json["session_id"].as_str().unwrap().to_string();
    assert_eq!(session_id.len(), 8);
    assert!(session_id.chars().all(|c| c.is_ascii_hexdigit()));

    let metrics = &json["summary"]["metrics"];
    assert_eq!(metrics["max_hc_depth"], 1);
    assert_eq!(metrics["level5_pct"], 0.333);
    let kc = metrics["kc_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&kc));
    assert!(json["summary"]["feedback"].is_array());

    for file in ["words.json", "utterances.json", "metrics.json", "summary.json"] {
        assert!(app.session_dir(&session_id).join(file).is_file(), "{file} missing");
    }

    let resp = app
        .get(&format!("/api/results/{session_id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let results: Value = resp.json().await.unwrap();

    let utterances = results["utterances"].as_array().unwrap();
    assert_eq!(utterances.len(), 6);
    assert_eq!(utterances[0]["u_id"], 0);
    assert_eq!(utterances[0]["role"], "teacher");
    assert_eq!(utterances[0]["ohcr"], "O");
    assert_eq!(utterances[1]["role"], "student");
    assert_eq!(utterances[2]["disc_act"], "question");
    assert_eq!(utterances[3]["disc_act"], "regulatory");
    assert_eq!(utterances[3]["ohcr"], "?");
    assert_eq!(utterances[4]["ohcr"], "R");

    assert_eq!(results["summary"]["feedback"], json["summary"]["feedback"]);
    assert_eq!(results["summary"]["metrics"]["max_hc_depth"], 1);
}

#[tokio::test]
async fn missing_transcript_is_bad_gateway() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.wav", None).await;

    assert_eq!(resp.status().as_u16(), 502);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["error"], "bad_gateway");
}

fn stored_uploads(app: &TestApp) -> usize {
    std::fs::read_dir(&app.settings.storage.uploads_dir)
        .map(|dir| dir.count())
        .unwrap_or(0)
}

#[tokio::test]
async fn failed_upload_removes_audio() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.wav", None).await;

    assert_eq!(resp.status().as_u16(), 502);
    assert_eq!(stored_uploads(&app), 0);
}

#[tokio::test]
async fn failed_upload_removes_transcript() {
    let app = TestApp::spawn().await;

    // The SRT backend never reads a `.txt` transcript, so transcription fails.
    let resp = app.upload("lesson.wav", Some(("lesson.txt", "SPK_1\n0:01\nhello\n"))).await;

    assert_eq!(resp.status().as_u16(), 502);
    assert_eq!(stored_uploads(&app), 0);
}

#[tokio::test]
async fn successful_upload_keeps_files() {
    let app = TestApp::spawn().await;

    let resp = app.upload("lesson.wav", Some(("lesson.srt", LESSON_SRT))).await;

    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(stored_uploads(&app), 2);
}

#[tokio::test]
async fn json_fragments_backend() {
    let app = TestApp::spawn_with_format(TranscriptFormat::Json).await;
    let fragments = serde_json::json!([
        { "start": 0.0, "end": 1.0, "text": "hello" },
        { "start": 1.2, "end": 2.0, "text": "world" }
    ])
    .to_string();

    let resp = app.upload("lesson.wav", Some(("lesson.json", &fragments))).await;
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    let session_id = json["session_id"].as_str().unwrap();

    let results: Value = app
        .get(&format!("/api/results/{session_id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let utterances = results["utterances"].as_array().unwrap();
    assert_eq!(utterances.len(), 1);
    assert_eq!(utterances[0]["text"], "hello world");
}

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/results/deadbeef").send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn malformed_session_id_is_bad_request() {
    let app = TestApp::spawn().await;

    let resp = app.get("/api/results/..%2F..%2Fetc").send().await.unwrap();

    assert_eq!(resp.status().as_u16(), 400);
}
