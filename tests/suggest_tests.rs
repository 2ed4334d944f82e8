// Unit tests for suggestion response parsing and fallback sets

use voice_assist::{
    extract_suggestions, fallback_set, FallbackKind, SuggestError, SuggestionOrigin,
    SuggestionSet,
};

#[test]
fn extracts_suggestions_in_order() {
    let body = r#"{"suggestions": ["안녕하세요!", "반갑습니다"]}"#;
    assert_eq!(
        extract_suggestions(body),
        vec!["안녕하세요!".to_string(), "반갑습니다".to_string()]
    );
}

#[test]
fn missing_suggestions_key_yields_nothing() {
    assert!(extract_suggestions("{}").is_empty());
}

#[test]
fn empty_array_yields_nothing() {
    assert!(extract_suggestions(r#"{"suggestions": []}"#).is_empty());
}

#[test]
fn non_array_suggestions_yield_nothing() {
    assert!(extract_suggestions(r#"{"suggestions": "안녕"}"#).is_empty());
    assert!(extract_suggestions(r#"{"suggestions": 42}"#).is_empty());
}

#[test]
fn invalid_json_yields_nothing() {
    assert!(extract_suggestions("not json at all").is_empty());
    assert!(extract_suggestions("").is_empty());
}

#[test]
fn blank_items_are_dropped_and_text_trimmed() {
    let body = r#"{"suggestions": ["  안녕  ", "", "   "]}"#;
    assert_eq!(extract_suggestions(body), vec!["안녕".to_string()]);
}

#[test]
fn empty_response_fallback_is_the_single_placeholder() {
    let set = fallback_set(FallbackKind::EmptyResponse);
    assert_eq!(set.items, vec!["추천 문장을 가져오지 못했습니다."]);
}

#[test]
fn server_fallback_keeps_the_original_message() {
    let set = fallback_set(FallbackKind::Server);
    assert_eq!(set.items, vec!["GPT 응답 실패. 잠시 후 다시 시도해 주세요."]);
}

#[test]
fn every_fallback_kind_renders_something() {
    let kinds = [
        FallbackKind::EmptyResponse,
        FallbackKind::Timeout,
        FallbackKind::Connectivity,
        FallbackKind::Server,
        FallbackKind::NoSpeech,
        FallbackKind::LowConfidence,
        FallbackKind::PermissionDenied,
        FallbackKind::CaptureUnavailable,
        FallbackKind::RecognizerNetwork,
        FallbackKind::RecognizerFailed,
    ];

    for kind in kinds {
        let set = fallback_set(kind);
        assert!(!set.items.is_empty(), "{:?} has no message", kind);
        assert!(set.items.iter().all(|item| !item.trim().is_empty()));
        assert_eq!(set.origin, SuggestionOrigin::Fallback(kind));
        assert!(set.is_fallback());
    }
}

#[test]
fn backend_sets_are_not_fallbacks() {
    let set = SuggestionSet::backend(vec!["안녕하세요!".to_string()]);
    assert_eq!(set.origin, SuggestionOrigin::Backend);
    assert!(!set.is_fallback());
}

#[test]
fn fetch_failures_map_to_their_own_sets() {
    assert_eq!(
        SuggestError::Timeout.fallback_kind(),
        FallbackKind::Timeout
    );
    assert_eq!(
        SuggestError::Connectivity.fallback_kind(),
        FallbackKind::Connectivity
    );
    assert_eq!(
        SuggestError::Server { status: 502 }.fallback_kind(),
        FallbackKind::Server
    );
    assert_eq!(
        SuggestError::Other("boom".to_string()).fallback_kind(),
        FallbackKind::Server
    );
}

#[test]
fn distinct_failures_render_distinct_messages() {
    let timeout = fallback_set(FallbackKind::Timeout);
    let connectivity = fallback_set(FallbackKind::Connectivity);
    let server = fallback_set(FallbackKind::Server);

    assert_ne!(timeout.items, connectivity.items);
    assert_ne!(timeout.items, server.items);
    assert_ne!(connectivity.items, server.items);
}
