// Configuration loading tests

use std::io::Write;
use std::time::Duration;

use voice_assist::Config;

#[test]
fn defaults_cover_every_section() {
    let cfg = Config::default();

    assert_eq!(cfg.recognition.locale, "ko-KR");
    assert_eq!(cfg.recognition.auto_stop(), Duration::from_secs(5));
    assert!((cfg.recognition.min_confidence - 0.3).abs() < f32::EPSILON);
    assert_eq!(cfg.recognition.max_alternatives, 3);

    assert_eq!(
        cfg.suggestion.url,
        "https://voice-assist-backend.onrender.com/ask-gpt"
    );
    assert_eq!(cfg.suggestion.timeout(), Duration::from_secs(15));
    assert!(cfg.suggestion.user_id.is_none());

    assert!(cfg.synthesis.command.is_none());
    assert_eq!(cfg.synthesis.locale, "ko-KR");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let cfg = Config::load("/nonexistent/voice-assist").expect("defaults should load");
    assert_eq!(cfg.recognition.auto_stop(), Duration::from_secs(5));
    assert_eq!(cfg.suggestion.timeout(), Duration::from_secs(15));
}

#[test]
fn file_overrides_individual_sections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("voice-assist.toml");
    let mut file = std::fs::File::create(&path).expect("create config");
    writeln!(
        file,
        r#"
[recognition]
locale = "en-US"
auto_stop_secs = 7

[suggestion]
timeout_secs = 20

[synthesis]
command = "espeak-ng"
"#
    )
    .expect("write config");

    let cfg = Config::load(path.to_str().unwrap()).expect("load config");

    assert_eq!(cfg.recognition.locale, "en-US");
    assert_eq!(cfg.recognition.auto_stop(), Duration::from_secs(7));
    // untouched fields keep their defaults
    assert!((cfg.recognition.min_confidence - 0.3).abs() < f32::EPSILON);
    assert_eq!(cfg.suggestion.timeout(), Duration::from_secs(20));
    assert_eq!(cfg.synthesis.command.as_deref(), Some("espeak-ng"));
}

#[test]
fn out_of_range_confidence_is_clamped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("voice-assist.toml");
    std::fs::write(&path, "[recognition]\nmin_confidence = 1.5\n").expect("write config");

    let cfg = Config::load(path.to_str().unwrap()).expect("load config");
    assert!((cfg.recognition.min_confidence - 1.0).abs() < f32::EPSILON);
}
