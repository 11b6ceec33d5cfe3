use unicode_segmentation::UnicodeSegmentation;

/// First `max_len` graphemes of `s`, used for log previews.
pub fn substr_up_to_len(s: &str, max_len: usize) -> String {
    s.graphemes(true).take(max_len).collect::<String>()
}

/// First non-empty line of a prompt, shortened for logging.
pub fn log_preview(s: &str) -> String {
    let line = s.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    substr_up_to_len(line.trim(), 40)
}
