//! Pre-wrapping text to a fixed display width.
//!
//! Transcript rows are wrapped here and rendered without ratatui's own
//! wrapping so that row counts used for scrolling match what is on screen.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Word-wrap a single line. Words wider than `width` are split; a soft break
/// drops the spaces it lands on. Always yields at least one row.
pub fn wrap_words(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let visible_width = word.trim_end_matches(' ').width();

        if current_width > 0 && current_width + visible_width > width {
            rows.push(current.trim_end_matches(' ').to_string());
            current.clear();
            current_width = 0;
        }

        if visible_width > width {
            for ch in word.chars() {
                let w = char_width(ch);
                if current_width > 0 && current_width + w > width {
                    rows.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                current.push(ch);
                current_width += w;
            }
        } else {
            current.push_str(word);
            current_width += word.width();
        }
    }

    rows.push(current);
    rows
}

/// Word-wrap text that may contain newlines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    text.split('\n')
        .flat_map(|line| wrap_words(line, width))
        .collect()
}

/// Cut `text` to `width` columns, ending with `…` when something was dropped.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = char_width(ch);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_wrap_at_spaces() {
        assert_eq!(wrap_words("hello world", 5), vec!["hello", "world"]);
        assert_eq!(
            wrap_words("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap_words("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn spacing_is_preserved_inside_rows() {
        assert_eq!(wrap_words("a    b", 20), vec!["a    b"]);
    }

    #[test]
    fn empty_lines_survive() {
        assert_eq!(wrap_text("one\n\ntwo", 10), vec!["one", "", "two"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_words("日本語テキスト", 6), vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn fit_width_adds_ellipsis_only_when_cutting() {
        assert_eq!(fit_width("short", 10), "short");
        assert_eq!(fit_width("a longer title", 8), "a longe…");
        assert_eq!(fit_width("abc", 0), "");
    }
}
