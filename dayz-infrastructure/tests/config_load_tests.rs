use std::fs;

use dayz_infrastructure::AppConfig;

#[tokio::test]
async fn load_reads_file_and_resolves_relative_dirs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[general]
log_dir = "server-logs"

[duping_detector]
proximity_threshold = 15.5
login_count_threshold = 2

[nitrado]
api_token = "  "
service_id = "12345"
server_id = "678"
"#,
    )
    .expect("write");

    let config = AppConfig::load(Some(path)).await.expect("load");
    let runtime = config.to_runtime_config();
    assert_eq!(runtime.log_dir, dir.path().join("server-logs").to_string_lossy());
    assert_eq!(runtime.scan.proximity_threshold, Some(15.5));
    assert_eq!(runtime.scan.login_count_threshold, Some(2));
    assert_eq!(runtime.nitrado.api_token, None);
    assert_eq!(
        runtime.nitrado.default_log_directory(),
        "games/678/ftproot/dayzxb/config/"
    );
}

#[tokio::test]
async fn load_rejects_invalid_thresholds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    fs::write(&path, "[duping_detector]\ntime_threshold = 0.0\n").expect("write");
    assert!(AppConfig::load(Some(path)).await.is_err());
}

#[tokio::test]
async fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AppConfig::load(Some(dir.path().join("absent.toml")))
        .await
        .expect("load");
    assert_eq!(config.to_runtime_config().scan.time_threshold, Some(60.0));
}
