use super::*;

#[test]
fn empty_file_uses_defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.api_base, "http://localhost:8000");
    assert!(config.voice.enabled);
    assert_eq!(config.voice.fallback.rate, 1.15);
    assert_eq!(config.voice.fallback.lang, "en-US");
    assert_eq!(config.playback.speed, Speed::NORMAL);
    assert_eq!(
        config.reconnect_policy(),
        ReconnectPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(2000),
        }
    );
}

#[test]
fn ws_url_is_derived_from_api_base() {
    let config = EngineConfig::default();
    assert_eq!(config.ws_url().unwrap().as_str(), "ws://localhost:8000/ws");

    let config = EngineConfig::from_toml_str(r#"api_base = "https://viz.example.com/api""#).unwrap();
    assert_eq!(config.ws_url().unwrap().as_str(), "wss://viz.example.com/ws");
}

#[test]
fn partial_sections_merge_with_defaults() {
    let config = EngineConfig::from_toml_str(
        r#"
        [voice]
        enabled = false
        [voice.fallback]
        rate = 1.0
        [channel]
        max_reconnect_attempts = 2
        [playback]
        speed = 1.5
        "#,
    )
    .unwrap();
    assert!(!config.voice.enabled);
    assert_eq!(config.voice.fallback.rate, 1.0);
    assert_eq!(config.voice.fallback.pitch, 1.0);
    assert_eq!(config.channel.max_reconnect_attempts, 2);
    assert_eq!(config.channel.reconnect_base_delay_ms, 2000);
    assert_eq!(config.playback.speed, Speed::new(1.5).unwrap());
}

#[test]
fn invalid_values_are_rejected() {
    let err = EngineConfig::from_toml_str("[playback]\nspeed = 0").unwrap_err();
    assert!(err.to_string().starts_with("serialization error:"));

    let err = EngineConfig::from_toml_str(r#"api_base = "ftp://host""#).unwrap_err();
    assert!(err.to_string().starts_with("validation error:"));

    assert!(EngineConfig::from_toml_str("colour = \"red\"").is_err());
}

#[test]
fn env_overrides_win() {
    let mut config = EngineConfig::default();
    config
        .apply_env(|key| match key {
            ENV_API_BASE => Some("http://10.0.0.2:9000".to_owned()),
            ENV_VOICE_ID => Some("narrator".to_owned()),
            _ => None,
        })
        .unwrap();
    assert_eq!(config.api_base, "http://10.0.0.2:9000");
    assert_eq!(config.voice.voice_id.as_deref(), Some("narrator"));
    assert_eq!(config.ws_url().unwrap().as_str(), "ws://10.0.0.2:9000/ws");

    config
        .apply_env(|key| (key == ENV_WS_URL).then(|| "wss://live.example.com/socket".to_owned()))
        .unwrap();
    assert_eq!(
        config.ws_url().unwrap().as_str(),
        "wss://live.example.com/socket"
    );

    let mut bad = EngineConfig::default();
    assert!(
        bad.apply_env(|key| (key == ENV_WS_URL).then(|| "http://nope".to_owned()))
            .is_err()
    );
}
