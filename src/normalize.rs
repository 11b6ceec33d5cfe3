//! Strips markdown code fences the model sometimes adds despite being told not to.

const FENCE: &str = "```";

/// Returns the interior of the first fenced block, or the trimmed text if there is none.
///
/// An opening fence is three backticks, an optional tag made of word characters, and a newline.
/// The block ends at the next three backticks.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();
    match first_fenced_block(text) {
        Some(inner) => inner.trim().to_owned(),
        None => text.to_owned(),
    }
}

fn first_fenced_block(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(found) = text[from..].find(FENCE) {
        let opener = from + found;
        let after_opener = opener + FENCE.len();
        if let Some(body_start) = skip_fence_header(text, after_opener) {
            // No closer after a valid opener means no closer after any later one either
            let body_len = text[body_start..].find(FENCE)?;
            return Some(&text[body_start..body_start + body_len]);
        }
        // Backticks may overlap, e.g. four in a row
        from = opener + 1;
    }
    None
}

/// Consumes `\w*\n` starting at `pos`, returning the index just past the newline.
fn skip_fence_header(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let tag_len = rest
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    rest[tag_len..]
        .starts_with('\n')
        .then_some(pos + tag_len + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tagged_block() {
        assert_eq!(normalize("```python\nprint('hi')\n```"), "print('hi')");
    }

    #[test]
    fn extracts_untagged_block() {
        assert_eq!(normalize("```\nfn main() {}\n```"), "fn main() {}");
    }

    #[test]
    fn text_around_block_is_dropped() {
        let raw = "Here you go:\n```go\npackage main\n\nfunc main() {}\n```\nEnjoy!";
        assert_eq!(normalize(raw), "package main\n\nfunc main() {}");
    }

    #[test]
    fn only_first_block_is_used() {
        let raw = "```rust\nlet a = 1;\n```\n\n```rust\nlet b = 2;\n```";
        assert_eq!(normalize(raw), "let a = 1;");
    }

    #[test]
    fn no_fence_returns_trimmed_input() {
        assert_eq!(normalize("  x = 1\n\n"), "x = 1");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn unclosed_fence_returns_trimmed_input() {
        assert_eq!(normalize("```python\nprint(1)\n"), "```python\nprint(1)");
    }

    #[test]
    fn opener_needs_newline_after_tag() {
        // Inline backticks on one line are not a block
        assert_eq!(normalize("use ```x``` here"), "use ```x``` here");
        assert_eq!(normalize("``` python\ncode\n```"), "``` python\ncode\n```");
    }

    #[test]
    fn skips_invalid_opener_and_finds_later_block() {
        let raw = "see ```inline``` then\n```js\nlet x;\n```";
        assert_eq!(normalize(raw), "let x;");
    }

    #[test]
    fn four_backticks_open_a_block() {
        assert_eq!(normalize("````\ncode\n````"), "code");
    }

    #[test]
    fn unicode_tag_and_body() {
        assert_eq!(normalize("```résumé\nnaïve ✓\n```"), "naïve ✓");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "```python\nCODE\n```",
            "plain text",
            "  padded  ",
            "```\n```",
            "a ```b\n``` c",
            "```py\nx\n```\n```py\ny\n```",
            "````\ncode\n````",
            "```unclosed\nbody",
            "\n\n```rs\n  inner  \n```\n\n",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }
}
