//! # Text Layout
//!
//! Greedy line breaking over UAX#14 break opportunities. The reference
//! layout surface measures paragraphs with this, and the CLI uses the same
//! lines for its plain-text page preview, so both agree on where lines end.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::TextMetrics;
use crate::model::TextStyle;

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct BrokenLine {
    pub text: String,
    /// Width excluding trailing spaces.
    pub width: f64,
}

/// Compute UAX#14 break opportunities indexed by char position.
///
/// Entry `i` is the opportunity *before* char `i`. Index 0 is always `None`.
fn compute_break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    // linebreaks() yields the byte offset of the start of the next segment
    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        for (char_idx, (byte_idx, _)) in text.char_indices().enumerate() {
            map[byte_idx] = char_idx;
        }
        map[text.len()] = char_count;
        map
    };

    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn make_line(chars: &[char], widths: &[f64]) -> BrokenLine {
    let kept: Vec<(char, f64)> = chars
        .iter()
        .zip(widths)
        .filter(|(c, _)| !is_newline(**c) && **c != '\u{00AD}')
        .map(|(c, w)| (*c, *w))
        .collect();

    let mut end = kept.len();
    while end > 0 && kept[end - 1].0 == ' ' {
        end -= 1;
    }

    BrokenLine {
        text: kept.iter().map(|(c, _)| *c).collect(),
        width: kept[..end].iter().map(|(_, w)| w).sum(),
    }
}

/// Break `text` into lines no wider than `max_width`.
///
/// Empty text still occupies one (empty) line. A word wider than
/// `max_width` is broken between characters.
pub fn break_into_lines(
    metrics: &dyn TextMetrics,
    text: &str,
    max_width: f64,
    font_size: f64,
    bold: bool,
) -> Vec<BrokenLine> {
    if text.is_empty() {
        return vec![BrokenLine {
            text: String::new(),
            width: 0.0,
        }];
    }

    let chars: Vec<char> = text.chars().collect();
    let char_widths: Vec<f64> = chars
        .iter()
        .map(|&ch| {
            if is_newline(ch) {
                0.0
            } else {
                metrics.char_width(ch, font_size, bold)
            }
        })
        .collect();
    let break_opps = compute_break_opportunities(text);

    let mut lines = Vec::new();
    let mut line_start = 0;
    let mut line_width = 0.0;
    let mut last_break_point: Option<usize> = None;

    for (i, &ch) in chars.iter().enumerate() {
        let char_width = char_widths[i];

        if i > 0 {
            match break_opps[i] {
                Some(BreakOpportunity::Mandatory) => {
                    lines.push(make_line(&chars[line_start..i], &char_widths[line_start..i]));
                    line_start = i;
                    line_width = 0.0;
                    last_break_point = None;
                }
                // The char before this position may end a line
                Some(BreakOpportunity::Allowed) => last_break_point = Some(i - 1),
                None => {}
            }
        }

        if is_newline(ch) {
            continue;
        }

        // Whitespace hangs past the edge instead of wrapping
        if matches!(ch, ' ' | '\t') {
            line_width += char_width;
            continue;
        }

        if line_width + char_width > max_width && line_start < i {
            if let Some(bp) = last_break_point.filter(|bp| *bp >= line_start) {
                let break_at = bp + 1;
                lines.push(make_line(
                    &chars[line_start..break_at],
                    &char_widths[line_start..break_at],
                ));
                line_start = break_at;
                line_width = char_widths[line_start..=i].iter().sum();
                last_break_point = None;
                continue;
            }

            // No break point on this line: force a break before this char
            lines.push(make_line(&chars[line_start..i], &char_widths[line_start..i]));
            line_start = i;
            line_width = char_width;
            last_break_point = None;
            continue;
        }

        line_width += char_width;
    }

    if line_start < chars.len() {
        lines.push(make_line(&chars[line_start..], &char_widths[line_start..]));
    }

    lines
}

/// Height of `text` laid out at `max_width` in `style`.
pub fn text_height(metrics: &dyn TextMetrics, text: &str, max_width: f64, style: &TextStyle) -> f64 {
    let lines = break_into_lines(metrics, text, max_width, style.font_size, style.bold);
    lines.len() as f64 * style.line_advance() + style.space_after
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::StandardMetrics;

    // StandardMetrics: lowercase ASCII letters are 0.5 em, space is 0.278 em
    fn lines_of(text: &str, max_width: f64) -> Vec<String> {
        break_into_lines(&StandardMetrics, text, max_width, 10.0, false)
            .into_iter()
            .map(|l| l.text)
            .collect()
    }

    #[test]
    fn short_text_single_line() {
        assert_eq!(lines_of("zanni", 100.0), vec!["zanni"]);
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(lines_of("", 100.0), vec![""]);
    }

    #[test]
    fn breaks_at_spaces() {
        // "aaaa " is 22.78pt wide, two words don't fit in 40pt
        let lines = lines_of("aaaa bbbb cccc", 40.0);
        assert_eq!(lines, vec!["aaaa ", "bbbb ", "cccc"]);
    }

    #[test]
    fn space_at_the_edge_hangs() {
        // "aaaa" fills 20pt exactly; the space after it must not wrap alone
        assert_eq!(lines_of("aaaa bbbb", 20.0), vec!["aaaa ", "bbbb"]);
        let lines = break_into_lines(&StandardMetrics, "aaaa bbbb", 20.0, 10.0, false);
        assert!((lines[0].width - 20.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_space_not_counted() {
        let lines = break_into_lines(&StandardMetrics, "aaaa bbbb", 40.0, 10.0, false);
        assert!((lines[0].width - 20.0).abs() < 1e-9);
    }

    #[test]
    fn mandatory_break_on_newline() {
        assert_eq!(lines_of("aa\nbb", 100.0), vec!["aa", "bb"]);
    }

    #[test]
    fn long_word_is_forced_apart() {
        let lines = lines_of("aaaaaaaaaa", 20.0);
        assert_eq!(lines, vec!["aaaa", "aaaa", "aa"]);
    }

    #[test]
    fn height_counts_lines_and_spacing() {
        let style = TextStyle {
            font_size: 10.0,
            line_height: 1.5,
            space_after: 4.0,
            bold: false,
        };
        let h = text_height(&StandardMetrics, "aaaa bbbb cccc", 40.0, &style);
        assert!((h - (3.0 * 15.0 + 4.0)).abs() < 1e-9);
    }
}
