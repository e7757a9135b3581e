//! Text preparation for synthesis.
//!
//! Spoken text is shorter and plainer than rendered text: decorative
//! symbols are stripped, newlines become sentence breaks, and long replies
//! are cut at a sentence boundary so the voice stays reliable.

/// Decorative symbols stripped before synthesis. The variation selector is
/// included because emoji sequences carry it as a separate scalar.
const DECORATIVE_SYMBOLS: &[char] = &[
    '👋', '💡', '⚠', '🚨', '😊', '🤔', '💪', '🩺', '🏥', '💊', '📊', '⭐', '\u{fe0f}',
];

/// Strips decorative symbols and collapses newline runs into ". ".
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_newline_run = false;

    for c in text.chars() {
        if c == '\n' {
            if !in_newline_run {
                out.push_str(". ");
                in_newline_run = true;
            }
            continue;
        }
        in_newline_run = false;
        if DECORATIVE_SYMBOLS.contains(&c) {
            continue;
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Truncates to at most `max_chars` characters, preferring the last
/// sentence boundary before the limit. The boundary period is kept; with no
/// boundary the text is hard-cut and an ellipsis appended.
pub fn truncate_for_tts(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    match truncated.rfind('.') {
        Some(pos) if pos > 0 => truncated[..=pos].to_string(),
        _ => format!("{}...", truncated),
    }
}

/// Full preparation pipeline: sanitize, then truncate.
pub fn prepare(text: &str, max_chars: usize) -> String {
    truncate_for_tts(&sanitize(text), max_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_decorative_symbols() {
        assert_eq!(sanitize("Hey there! 👋 Welcome"), "Hey there!  Welcome");
        assert_eq!(sanitize("⚠️Careful"), "Careful");
        assert_eq!(sanitize("📊 stats ⭐"), "stats");
    }

    #[test]
    fn test_sanitize_collapses_newlines() {
        assert_eq!(sanitize("first\nsecond"), "first. second");
        assert_eq!(sanitize("first\n\n\nsecond"), "first. second");
    }

    #[test]
    fn test_sanitize_trims() {
        assert_eq!(sanitize("  spaced  "), "spaced");
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        let text = "short reply.";
        assert_eq!(truncate_for_tts(text, 200), text);
    }

    #[test]
    fn test_truncate_cuts_at_sentence_boundary() {
        // 250 chars with the only period at index 180: the result keeps the
        // period, so it is 181 chars long.
        let mut text = "a".repeat(180);
        text.push('.');
        text.push_str(&"b".repeat(69));
        assert_eq!(text.len(), 250);

        let out = truncate_for_tts(&text, 200);
        assert_eq!(out.len(), 181);
        assert!(out.ends_with('.'));
    }

    #[test]
    fn test_truncate_hard_cut_with_ellipsis() {
        // 250 chars, no period anywhere before the cutoff
        let text = "a".repeat(250);
        let out = truncate_for_tts(&text, 200);
        assert_eq!(out, format!("{}...", "a".repeat(200)));
    }

    #[test]
    fn test_truncate_period_at_start_falls_back() {
        let mut text = ".".to_string();
        text.push_str(&"a".repeat(249));
        let out = truncate_for_tts(&text, 200);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_prepare_pipeline() {
        let text = format!("Hello 👋 world.\n{}", "x".repeat(300));
        let out = prepare(&text, 200);
        assert!(out.starts_with("Hello  world."));
        assert!(out.len() <= 203);
    }
}
