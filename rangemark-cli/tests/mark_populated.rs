//! End-to-end patch mode: per-record outcomes, partial failure, idempotent
//! exit policy.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MARKER: &str = "// managed by rangemark";

fn range_json(id: u64, description: &str, populated: bool) -> serde_json::Value {
    json!({
        "id": id,
        "start_address": format!("10.0.{id}.1/24"),
        "end_address": format!("10.0.{id}.254/24"),
        "description": description,
        "mark_populated": populated,
        "size": 254
    })
}

fn list_body(results: Vec<serde_json::Value>) -> serde_json::Value {
    json!({ "count": results.len(), "next": null, "previous": null, "results": results })
}

async fn mount_status_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

async fn mount_patch(server: &MockServer, id: u64, status: u16, expected_calls: u64) {
    Mock::given(method("PATCH"))
        .and(path(format!("/api/ipam/ip-ranges/{id}/")))
        .and(body_json(json!({ "mark_populated": true })))
        .respond_with(ResponseTemplate::new(status))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn run_rangemark(server_uri: String, args: Vec<&'static str>) -> std::process::Output {
    tokio::task::spawn_blocking(move || {
        std::process::Command::new(assert_cmd::cargo::cargo_bin!("rangemark"))
            .env("RANGEMARK_API", &server_uri)
            .env("RANGEMARK_TOKEN", "sekrit")
            .env("RANGEMARK_TIMEOUT_SECS", "5")
            .env_remove("RANGEMARK_MARKER")
            .env_remove("RANGEMARK_CA_CERT")
            .env_remove("RANGEMARK_RETRIES")
            .args(args)
            .output()
            .expect("run rangemark")
    })
    .await
    .expect("join")
}

#[tokio::test(flavor = "multi_thread")]
async fn patches_every_match_and_reports_the_tally() {
    let server = MockServer::start().await;
    mount_status_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/ip-ranges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            range_json(1, &format!("3.0.1.0/24 {MARKER}"), false),
            range_json(2, &format!("3.0.2.0/24 {MARKER}"), false),
        ])))
        .mount(&server)
        .await;
    mount_patch(&server, 1, 200, 1).await;
    mount_patch(&server, 2, 200, 1).await;

    let output = run_rangemark(server.uri(), vec!["--mark-populated"]).await;
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("Marking 2 IP range(s) as populated..."), "{stdout}");
    assert!(stdout.contains("✓ Patched IP range 1"), "{stdout}");
    assert!(stdout.contains("✓ Patched IP range 2"), "{stdout}");
    assert!(stdout.contains("Done: 2 patched, 0 failed."), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn a_failing_record_does_not_stop_the_batch_and_exit_stays_zero() {
    let server = MockServer::start().await;
    mount_status_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/ip-ranges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            range_json(1, &format!("3.0.1.0/24 {MARKER}"), false),
            range_json(2, &format!("3.0.2.0/24 {MARKER}"), false),
            range_json(3, &format!("3.0.3.0/24 {MARKER}"), false),
        ])))
        .mount(&server)
        .await;
    mount_patch(&server, 1, 200, 1).await;
    mount_patch(&server, 2, 500, 1).await;
    mount_patch(&server, 3, 200, 1).await;

    let output = run_rangemark(server.uri(), vec!["--mark-populated"]).await;
    assert!(
        output.status.success(),
        "patch failures must not fail the run; stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("✓ Patched IP range 1"), "{stdout}");
    assert!(stdout.contains("✗ Failed to patch IP range 2"), "{stdout}");
    assert!(
        stdout.contains("✓ Patched IP range 3"),
        "the record after the failure must still be patched: {stdout}"
    );
    assert!(stdout.contains("Done: 2 patched, 1 failed."), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn not_populated_only_skips_already_populated_records() {
    let server = MockServer::start().await;
    mount_status_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/ip-ranges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            range_json(1, &format!("3.0.1.0/24 {MARKER}"), false),
            range_json(2, &format!("3.0.2.0/24 {MARKER}"), true),
        ])))
        .mount(&server)
        .await;
    mount_patch(&server, 1, 200, 1).await;
    mount_patch(&server, 2, 200, 0).await;

    let output = run_rangemark(
        server.uri(),
        vec!["--mark-populated", "--not-populated-only"],
    )
    .await;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    assert!(stdout.contains("Showing 1 matching IP range(s)"), "{stdout}");
    assert!(stdout.contains("Done: 1 patched, 0 failed."), "{stdout}");
}

#[tokio::test(flavor = "multi_thread")]
async fn json_mode_reports_patch_outcomes() {
    let server = MockServer::start().await;
    mount_status_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/ipam/ip-ranges/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
            range_json(1, &format!("3.0.1.0/24 {MARKER}"), false),
            range_json(2, &format!("3.0.2.0/24 {MARKER}"), false),
        ])))
        .mount(&server)
        .await;
    mount_patch(&server, 1, 200, 1).await;
    mount_patch(&server, 2, 404, 1).await;

    let output = run_rangemark(server.uri(), vec!["--mark-populated", "--json"]).await;
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse json");

    assert_eq!(payload["patch"]["succeeded"], 1);
    assert_eq!(payload["patch"]["failed"], 1);
    assert_eq!(payload["patch"]["outcomes"][0]["status"], "patched");
    assert_eq!(payload["patch"]["outcomes"][1]["status"], "failed");
    assert_eq!(payload["patch"]["outcomes"][1]["id"], 2);
}
