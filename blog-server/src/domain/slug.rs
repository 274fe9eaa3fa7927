use std::sync::OnceLock;

use regex::Regex;

static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();

fn separator_run() -> &'static Regex {
    SEPARATOR_RUN.get_or_init(|| {
        // Letters, numbers and `_` survive; combining marks do not.
        Regex::new(r"[^\p{L}\p{N}_]+")
            .unwrap_or_else(|error| panic!("slug regex failed to compile: {error}"))
    })
}

/// Turns arbitrary text into a slug: trimmed, lowercased, every run of
/// characters other than letters, numbers and `_` collapsed into `_`, no
/// leading or trailing `_`.
///
/// Total and idempotent; may return an empty string when the input has no
/// word characters at all.
pub(crate) fn normalize_slug(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let collapsed = separator_run().replace_all(&lowered, "_");
    collapsed.trim_matches('_').to_string()
}
