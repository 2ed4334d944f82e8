use serde::Serialize;

use super::set::{SuggestionOrigin, SuggestionSet};

/// Which substitute message set to render when no backend suggestions are
/// available, covering both suggestion-fetch failures and capture failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackKind {
    /// Response arrived but carried no usable suggestions array
    EmptyResponse,
    /// Suggestion request exceeded its deadline
    Timeout,
    /// Could not reach the suggestion service
    Connectivity,
    /// Suggestion service replied with an error
    Server,
    /// Capture ended without any speech
    NoSpeech,
    /// Transcript confidence fell below the acceptance threshold
    LowConfidence,
    /// Microphone permission was denied
    PermissionDenied,
    /// No usable capture device
    CaptureUnavailable,
    /// Recognizer could not reach its service
    RecognizerNetwork,
    /// Any other recognizer runtime failure
    RecognizerFailed,
}

const EMPTY_RESPONSE: &[&str] = &["추천 문장을 가져오지 못했습니다."];

const TIMEOUT: &[&str] = &[
    "응답 시간이 초과되었습니다.",
    "잠시 후 다시 시도해 주세요.",
];

const CONNECTIVITY: &[&str] = &[
    "네트워크 연결을 확인해 주세요.",
    "연결된 후 다시 시도해 주세요.",
];

const SERVER: &[&str] = &["GPT 응답 실패. 잠시 후 다시 시도해 주세요."];

const NO_SPEECH: &[&str] = &[
    "음성이 감지되지 않았습니다.",
    "다시 한 번 말씀해 주세요.",
];

const LOW_CONFIDENCE: &[&str] = &[
    "잘 알아듣지 못했어요.",
    "조금 더 또렷하게 말씀해 주세요.",
];

const PERMISSION_DENIED: &[&str] = &["마이크 사용 권한이 거부되었습니다."];

const CAPTURE_UNAVAILABLE: &[&str] = &["마이크를 찾을 수 없습니다."];

const RECOGNIZER_NETWORK: &[&str] = &[
    "음성 인식 서버에 연결하지 못했습니다.",
    "네트워크 상태를 확인해 주세요.",
];

const RECOGNIZER_FAILED: &[&str] = &["음성 인식에 실패했습니다. 다시 시도해 주세요."];

fn lines(kind: FallbackKind) -> &'static [&'static str] {
    match kind {
        FallbackKind::EmptyResponse => EMPTY_RESPONSE,
        FallbackKind::Timeout => TIMEOUT,
        FallbackKind::Connectivity => CONNECTIVITY,
        FallbackKind::Server => SERVER,
        FallbackKind::NoSpeech => NO_SPEECH,
        FallbackKind::LowConfidence => LOW_CONFIDENCE,
        FallbackKind::PermissionDenied => PERMISSION_DENIED,
        FallbackKind::CaptureUnavailable => CAPTURE_UNAVAILABLE,
        FallbackKind::RecognizerNetwork => RECOGNIZER_NETWORK,
        FallbackKind::RecognizerFailed => RECOGNIZER_FAILED,
    }
}

/// Build the fixed substitute set for a failure kind.
pub fn fallback_set(kind: FallbackKind) -> SuggestionSet {
    SuggestionSet {
        items: lines(kind).iter().map(|s| s.to_string()).collect(),
        origin: SuggestionOrigin::Fallback(kind),
    }
}
