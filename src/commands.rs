//! Spoken-command rewriting for transcripts.
//!
//! Whisper transcribes dictated commands literally ("hello new paragraph
//! world").  [`apply_voice_commands`] rewrites the supported command phrases
//! into their text equivalents:
//!
//! | Spoken phrase   | Replacement |
//! |-----------------|-------------|
//! | "new paragraph" | blank line (`\n\n`) |
//! | "new line"      | line break (`\n`)   |
//!
//! Matching is case-insensitive and whole-word only, so "renewed lines"
//! passes through untouched.  After substitution, spaces and tabs around
//! each inserted break are collapsed so "hello \n\n world" becomes
//! "hello\n\nworld".

use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

fn paragraph_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bnew paragraph\b").expect("valid regex"))
}

fn line_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bnew line\b").expect("valid regex"))
}

fn break_whitespace_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]*\n[ \t]*").expect("valid regex"))
}

// ---------------------------------------------------------------------------
// apply_voice_commands
// ---------------------------------------------------------------------------

/// Rewrite literal command phrases into paragraph/line breaks and normalize
/// the whitespace around them.
///
/// The result is trimmed; an input of only whitespace (or only command
/// phrases) yields an empty string.
///
/// # Example
///
/// ```rust
/// use flowkey::commands::apply_voice_commands;
///
/// assert_eq!(
///     apply_voice_commands("hello new paragraph world"),
///     "hello\n\nworld"
/// );
/// assert_eq!(apply_voice_commands("one New Line two"), "one\ntwo");
/// ```
pub fn apply_voice_commands(text: &str) -> String {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return String::new();
    }

    // "new paragraph" must run first so its output is not re-matched as a
    // "new line" phrase.
    let replaced = paragraph_pattern().replace_all(cleaned, "\n\n");
    let replaced = line_pattern().replace_all(&replaced, "\n");

    // Collapse spaces/tabs hugging each break; a blank line is two breaks
    // and survives as "\n\n".
    let normalized = break_whitespace_pattern().replace_all(&replaced, "\n");

    normalized.trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraph_command_becomes_blank_line() {
        assert_eq!(
            apply_voice_commands("hello new paragraph world"),
            "hello\n\nworld"
        );
    }

    #[test]
    fn line_command_becomes_line_break() {
        assert_eq!(apply_voice_commands("hello new line world"), "hello\nworld");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(apply_voice_commands("a New Paragraph b"), "a\n\nb");
        assert_eq!(apply_voice_commands("a NEW LINE b"), "a\nb");
    }

    #[test]
    fn whole_word_matching_only() {
        assert_eq!(
            apply_voice_commands("renewed lines and new linens"),
            "renewed lines and new linens"
        );
    }

    #[test]
    fn multiple_commands_in_one_transcript() {
        assert_eq!(
            apply_voice_commands("one new line two new paragraph three"),
            "one\ntwo\n\nthree"
        );
    }

    #[test]
    fn whitespace_around_breaks_is_collapsed() {
        // Whisper often leaves stray spaces around the command phrase.
        assert_eq!(
            apply_voice_commands("hello  new paragraph  world"),
            "hello\n\nworld"
        );
    }

    #[test]
    fn leading_and_trailing_commands_are_trimmed_away() {
        assert_eq!(apply_voice_commands("new paragraph hello"), "hello");
        assert_eq!(apply_voice_commands("hello new line"), "hello");
    }

    #[test]
    fn empty_and_whitespace_inputs_yield_empty() {
        assert_eq!(apply_voice_commands(""), "");
        assert_eq!(apply_voice_commands("   "), "");
        assert_eq!(apply_voice_commands("new paragraph"), "");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(apply_voice_commands("hello world"), "hello world");
    }
}
