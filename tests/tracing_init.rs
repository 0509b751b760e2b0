use qms_listkit_lib::{init_tracing, AppError};

#[test]
fn init_tracing_installs_once_and_writes_log_dir() {
    let root = tempfile::tempdir().expect("temp log root");
    let log_dir = root.path().join("logs");

    init_tracing(&log_dir).expect("first install");
    assert!(log_dir.is_dir());

    let log_files: Vec<String> = std::fs::read_dir(&log_dir)
        .expect("read log dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(
        log_files.iter().any(|name| name.starts_with("listkit.log")),
        "no log file in {log_files:?}"
    );

    let second = init_tracing(&log_dir).unwrap_err();
    assert!(matches!(second, AppError::Internal(_)));
}
