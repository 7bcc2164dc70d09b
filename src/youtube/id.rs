//! YouTube video identifier extraction

use regex::Regex;
use std::sync::LazyLock;

/// Length of a canonical YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// URL shapes tried in priority order: watch page, short link, embed, bare `/v/` path
static URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"(?:https?://)?(?:www\.)?youtube\.com/v/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("static YouTube URL pattern"))
    .collect()
});

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("static YouTube id pattern"));

/// Extract a YouTube video id from a URL, or accept the input itself when it
/// is already a bare 11-character id.
///
/// Returns `None` for empty input and for anything that does not reference a
/// YouTube video.
pub fn extract_video_id(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }

    for pattern in URL_PATTERNS.iter() {
        if let Some(id) = pattern.captures(input).and_then(|caps| caps.get(1)) {
            return Some(id.as_str().to_string());
        }
    }

    if BARE_ID.is_match(input) {
        return Some(input.to_string());
    }

    None
}

/// Variant of [`extract_video_id`] for optional fields
pub fn extract_video_id_opt(input: Option<&str>) -> Option<String> {
    input.and_then(extract_video_id)
}

/// Canonical watch-page link for a video id
pub fn canonical_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
