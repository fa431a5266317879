use std::fs;

use dayz_bootstrap::{run, Command, ScanArgs};

#[tokio::test]
async fn scan_command_writes_reports_into_configured_output_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::create_dir_all(dir.path().join("logs")).expect("mkdir");
    fs::write(
        dir.path().join("logs").join("DayZServer_x1.ADM"),
        "AdminLog started on 2024-01-15 at 08:00:00\n\
         08:00:00 | Player \"Survivor\"(id=AAA=) is connected\n",
    )
    .expect("write");
    let config = dir.path().join("config.toml");
    fs::write(&config, "[general]\nlog_dir = \"logs\"\noutput_dir = \"reports\"\n").expect("write");

    run(Some(config), Command::Scan(ScanArgs::default()))
        .await
        .expect("scan run");

    let mut written = fs::read_dir(dir.path().join("reports"))
        .expect("reports dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().to_string())
        .collect::<Vec<_>>();
    written.sort();
    assert_eq!(written.len(), 3);
    assert!(written[0].starts_with("suspicious_activities_"));
    assert!(written[1].starts_with("suspicious_logins_"));
    assert!(written[2].starts_with("suspicious_spawns_"));
}
