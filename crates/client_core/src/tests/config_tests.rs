use super::*;

use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("redstr_client_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(SETTINGS_FILE);
    fs::write(&path, contents).expect("write settings");
    path
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/redstr.toml"), env_from(&[]));
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.api_url, "http://localhost:8080");
    assert_eq!(settings.default_function, "leetspeak");
    assert_eq!(settings.request_timeout(), None);
    assert_eq!(
        settings.controller_options().copy_confirmation,
        Duration::from_secs(2)
    );
}

#[test]
fn file_values_are_read_including_integers() {
    let path = temp_settings_file(
        r#"
api_url = "http://transform.internal:9000/"
default_function = "base64"
request_timeout_secs = 15
response_ordering = "latest_dispatched"
"#,
    );

    let settings = load_settings_from(&path, env_from(&[]));
    assert_eq!(settings.api_url, "http://transform.internal:9000");
    assert_eq!(settings.default_function, "base64");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(15)));
    assert_eq!(
        settings.response_ordering,
        ResponseOrdering::LatestDispatched
    );

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_overrides_file() {
    let path = temp_settings_file("api_url = \"http://from-file\"\n");

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("APP__API_URL", "http://from-app-env"),
            ("APP__COPY_CONFIRMATION_MS", "500"),
        ]),
    );
    assert_eq!(settings.api_url, "http://from-app-env");
    assert_eq!(settings.copy_confirmation_ms, 500);

    let settings = load_settings_from(
        &path,
        env_from(&[
            ("APP__API_URL", "http://from-app-env"),
            ("REDSTR_API_URL", "http://from-redstr-env"),
        ]),
    );
    assert_eq!(settings.api_url, "http://from-redstr-env");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn unparseable_values_are_ignored() {
    let settings = load_settings_from(
        Path::new("/nonexistent/redstr.toml"),
        env_from(&[
            ("APP__REQUEST_TIMEOUT_SECS", "soon"),
            ("APP__RESPONSE_ORDERING", "random"),
            ("APP__DEFAULT_FUNCTION", "   "),
        ]),
    );
    assert_eq!(settings.request_timeout_secs, None);
    assert_eq!(settings.response_ordering, ResponseOrdering::LastResolved);
    assert_eq!(settings.default_function, "leetspeak");
}

#[test]
fn zero_timeout_means_no_timeout() {
    let settings = ClientSettings {
        request_timeout_secs: Some(0),
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn normalizes_blank_and_slashed_urls() {
    assert_eq!(normalize_api_url("  "), DEFAULT_API_URL);
    assert_eq!(normalize_api_url(" http://api.test// "), "http://api.test");
}
