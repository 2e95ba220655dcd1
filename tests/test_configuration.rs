use std::time::Duration;

use tunnelguard::{Config, Mode};

#[test]
fn parses_full_config() {
    let config: Config = serde_json::from_str(
        r#"{
            "mode": "L",
            "timeout": 3,
            "remote": { "host": "gateway", "user": "deploy", "port": 2222 },
            "forwarding_list": ["9000:dbhost:5432", "0.0.0.0:8080:web:80"]
        }"#,
    )
    .unwrap();

    assert_eq!(config.mode, Mode::Local);
    assert_eq!(config.connect_timeout(), Duration::from_secs(3));
    assert_eq!(config.remote.host, "gateway");
    assert_eq!(config.remote.user, "deploy");
    assert_eq!(config.remote.port, 2222);
    assert_eq!(config.forwarding_list.len(), 2);
}

#[test]
fn timeout_and_port_default() {
    let config: Config = serde_json::from_str(
        r#"{
            "mode": "remote",
            "remote": { "host": "gateway", "user": "deploy" },
            "forwarding_list": []
        }"#,
    )
    .unwrap();

    assert_eq!(config.mode, Mode::Remote);
    assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    assert_eq!(config.remote.port, 22);
}

#[test]
fn mode_aliases_accepted() {
    for (raw, expected) in [
        ("local", Mode::Local),
        ("L", Mode::Local),
        ("remote", Mode::Remote),
        ("R", Mode::Remote),
    ] {
        let config: Config = serde_json::from_str(&format!(
            r#"{{
                "mode": "{raw}",
                "remote": {{ "host": "h", "user": "u" }},
                "forwarding_list": []
            }}"#,
        ))
        .unwrap();
        assert_eq!(config.mode, expected);
    }
}

#[test]
fn unknown_mode_rejected() {
    let err = serde_json::from_str::<Config>(
        r#"{
            "mode": "sideways",
            "remote": { "host": "h", "user": "u" },
            "forwarding_list": []
        }"#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("unknown mode"));
}
