//! Video reference parsing.
//!
//! Exercises carry video references as full URLs (or, occasionally, bare
//! ids). Playback needs the 11-character platform id.

/// Overlay playlist shown when the motivational overlay is enabled.
/// The first entry is the main video.
pub const OVERLAY_PLAYLIST: [&str; 3] = ["5OZ-JOSWx1Q", "QGl-oFys0_E", "T4MgmEc_rs4"];

const VIDEO_ID_LEN: usize = 11;

/// Markers after which a video id may follow, in match priority order
const ID_MARKERS: [&str; 4] = ["youtu.be/", "v/", "embed/", "watch?"];

/// Extract the 11-character video id from a video URL.
///
/// The last recognised marker in the URL wins. Returns `None` when no
/// marker is present or the candidate id is not exactly 11 characters.
pub fn extract_video_id(url: &str) -> Option<String> {
    let bytes = url.as_bytes();

    let id_start = (0..bytes.len()).rev().find_map(|i| marker_end(url, i))?;

    let mut rest = &url[id_start..];
    for optional in ['?', 'v', '='] {
        if let Some(stripped) = rest.strip_prefix(optional) {
            rest = stripped;
        }
    }

    let candidate: String = rest
        .chars()
        .take_while(|c| !matches!(c, '#' | '&' | '?'))
        .collect();

    if candidate.chars().count() == VIDEO_ID_LEN {
        Some(candidate)
    } else {
        None
    }
}

/// If a marker starts at byte `i`, return the byte index right after it
fn marker_end(url: &str, i: usize) -> Option<usize> {
    let tail = url.get(i..)?;

    for marker in ID_MARKERS {
        if tail.starts_with(marker) {
            return Some(i + marker.len());
        }
    }

    // "/u/<word char>/"
    let b = tail.as_bytes();
    if b.len() >= 5
        && &b[..3] == b"/u/"
        && (b[3].is_ascii_alphanumeric() || b[3] == b'_')
        && b[4] == b'/'
    {
        return Some(i + 5);
    }

    None
}

/// Resolve a reference (URL or bare id) to a video id
pub fn resolve_video_id(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.contains("youtube.com") || reference.contains("youtu.be") {
        return extract_video_id(reference);
    }

    if is_bare_video_id(reference) {
        Some(reference.to_string())
    } else {
        None
    }
}

fn is_bare_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Watch link for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Loose absolute-URL check used by plan validation.
///
/// Requires a scheme followed by `:` and a non-empty, whitespace-free
/// remainder; http(s) URLs also need a host.
pub fn is_valid_url(s: &str) -> bool {
    let Some((scheme, rest)) = s.split_once(':') else {
        return false;
    };

    let scheme_ok = scheme
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));

    if !scheme_ok || rest.is_empty() || rest.chars().any(char::is_whitespace) {
        return false;
    }

    match scheme.to_ascii_lowercase().as_str() {
        "http" | "https" => rest
            .strip_prefix("//")
            .and_then(|r| r.split(['/', '?', '#']).next())
            .is_some_and(|host| !host.is_empty()),
        _ => true,
    }
}
