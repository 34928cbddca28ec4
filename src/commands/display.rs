//! Small formatting helpers for command output.

/// First seven characters of a commit sha, the way git abbreviates them.
pub fn short_sha(sha: &str) -> &str {
    match sha.char_indices().nth(7) {
        Some((idx, _)) => &sha[..idx],
        None => sha,
    }
}

/// Collapse `s` onto one line and cut it to `max_len` characters.
pub fn truncate_for_display(s: &str, max_len: usize) -> String {
    let single_line: String = s.lines().collect::<Vec<_>>().join(" ");

    if single_line.chars().count() <= max_len {
        single_line
    } else {
        let truncated: String = single_line
            .chars()
            .take(max_len.saturating_sub(1))
            .collect();
        format!("{truncated}…")
    }
}
