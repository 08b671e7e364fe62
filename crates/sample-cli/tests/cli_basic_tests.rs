use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a test command with no ambient service settings
fn sample() -> Command {
    let mut cmd = Command::cargo_bin("sample").unwrap();
    cmd.env_remove("OS_SAMPLE_URL")
        .env_remove("OS_AUTH_TOKEN")
        .env_remove("OS_SAMPLE_API_VERSION")
        .env_remove("SAMPLE_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    sample()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sample-show"))
        .stdout(predicate::str::contains("sample-list"))
        .stdout(predicate::str::contains("sample-create"))
        .stdout(predicate::str::contains("sample-delete"))
        .stdout(predicate::str::contains("sample-update"))
        .stdout(predicate::str::contains("sample-child-list"));
}

#[test]
fn test_version_flag() {
    sample()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_args_shows_help() {
    sample()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    sample()
        .arg("chassis-list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_list_help_shows_pagination_options() {
    sample()
        .args(["sample-list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--limit"))
        .stdout(predicate::str::contains("--marker"))
        .stdout(predicate::str::contains("--sort-key"))
        .stdout(predicate::str::contains("--sort-dir"))
        .stdout(predicate::str::contains("--detail"));
}

#[test]
fn test_missing_url_is_reported() {
    sample()
        .arg("sample-list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("ERROR: You must provide a sample service URL"));
}

#[test]
fn test_error_is_printed_once_without_wrapping() {
    sample()
        .arg("sample-list")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::eq(
            "ERROR: You must provide a sample service URL via either --os-sample-url or env[OS_SAMPLE_URL]\n",
        ));
}

#[test]
fn test_negative_limit_rejected_before_any_request() {
    sample()
        .args(["sample-list", "--limit", "-1"])
        .env("OS_SAMPLE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "ERROR: Expected non-negative --limit, got -1",
        ));
}

#[test]
fn test_invalid_api_version_rejected() {
    sample()
        .args(["sample-list", "--os-sample-api-version", "one"])
        .env("OS_SAMPLE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid API version"));
}

#[test]
fn test_invalid_sort_dir_rejected_by_parser() {
    sample()
        .args(["sample-list", "--sort-dir", "sideways"])
        .env("OS_SAMPLE_URL", "http://127.0.0.1:9")
        .assert()
        .failure()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_show_against_mock_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/sample/u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uuid": "u1",
            "description": "end to end",
            "extra": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let url = server.uri();
    tokio::task::spawn_blocking(move || {
        sample()
            .args(["sample-show", "u1"])
            .env("OS_SAMPLE_URL", url)
            .assert()
            .success()
            .stdout(predicate::str::contains("end to end"))
            .stdout(predicate::str::contains("Property"));
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_stops_at_first_failure() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/sample/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error_message": "{\"faultstring\": \"Sample gone could not be found.\"}"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/sample/next"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let url = server.uri();
    tokio::task::spawn_blocking(move || {
        sample()
            .args(["sample-delete", "gone", "next"])
            .env("OS_SAMPLE_URL", url)
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains(
                "ERROR: Not found: Sample gone could not be found.",
            ));
    })
    .await
    .unwrap();
}
