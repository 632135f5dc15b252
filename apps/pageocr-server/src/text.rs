//! Line Reconstruction
//!
//! Rebuilds page text from word-level OCR output. Words are grouped into
//! lines by *runs* of equal line ids in reading order: a line id that
//! reappears after a different one starts a new line.

use crate::layout::Region;

/// Word texts and regions went out of step
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Alignment error: {regions} regions but {texts} texts")]
pub struct AlignmentError {
    pub regions: usize,
    pub texts: usize,
}

/// Check that two independently produced lists still line up
pub fn check_alignment(regions: usize, texts: usize) -> Result<(), AlignmentError> {
    if regions != texts {
        return Err(AlignmentError { regions, texts });
    }
    Ok(())
}

/// Join `(line_id, text)` pairs into newline-delimited page text
///
/// Tokens are joined verbatim with a single space; only each joined line
/// and the final result are trimmed.
pub fn reconstruct_text<L, S, I>(words: I) -> String
where
    L: PartialEq,
    S: AsRef<str>,
    I: IntoIterator<Item = (L, S)>,
{
    let mut words = words.into_iter();
    let Some((first_line, first_text)) = words.next() else {
        return String::new();
    };

    let mut lines: Vec<String> = Vec::new();
    let mut current_line = first_line;
    let mut buffer: Vec<S> = vec![first_text];

    for (line, text) in words {
        if line == current_line {
            buffer.push(text);
        } else {
            lines.push(join_line(&buffer));
            buffer = vec![text];
            current_line = line;
        }
    }
    // Last run has no successor to trigger its flush
    lines.push(join_line(&buffer));

    lines.join("\n").trim().to_string()
}

fn join_line<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|word| word.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Page text for aligned regions and OCR texts
pub fn format_page<S: AsRef<str>>(regions: &[Region], texts: &[S]) -> Result<String, AlignmentError> {
    check_alignment(regions.len(), texts.len())?;
    Ok(reconstruct_text(
        regions.iter().map(|region| &region.line).zip(texts.iter()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BoundingBox;

    fn region(line: i64) -> Region {
        Region::new(BoundingBox::new(0, 0, 1, 1), line)
    }

    #[test]
    fn test_run_length_grouping() {
        let words = vec![(1, "a"), (1, "b"), (2, "c"), (2, "d"), (2, "e"), (1, "f")];
        assert_eq!(reconstruct_text(words), "a b\nc d e\nf");
    }

    #[test]
    fn test_single_word_is_flushed() {
        assert_eq!(reconstruct_text(vec![(1, "only")]), "only");
    }

    #[test]
    fn test_last_line_is_flushed() {
        let words = vec![(1, "first"), (2, "second"), (2, "line")];
        assert_eq!(reconstruct_text(words), "first\nsecond line");
    }

    #[test]
    fn test_inner_spacing_is_verbatim() {
        // " a " + " " + "b " -> " a  b " -> "a  b"
        let words = vec![(1, " a "), (1, "b ")];
        assert_eq!(reconstruct_text(words), "a  b");
    }

    #[test]
    fn test_each_line_trimmed() {
        let words = vec![(1, " lead"), (2, "trail "), (3, " both ")];
        assert_eq!(reconstruct_text(words), "lead\ntrail\nboth");
    }

    #[test]
    fn test_empty_words_are_kept() {
        // An empty word in the middle of a run still contributes its separator
        let words = vec![(1, "a"), (1, ""), (1, "b")];
        assert_eq!(reconstruct_text(words), "a  b");

        // An empty line in the middle survives as a blank line
        let words = vec![(1, "top"), (2, ""), (3, "bottom")];
        assert_eq!(reconstruct_text(words), "top\n\nbottom");
    }

    #[test]
    fn test_line_count_matches_runs() {
        let words = vec![(7, "x"), (3, "y"), (7, "z"), (7, "w"), (3, "v")];
        let text = reconstruct_text(words);
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text, "x\ny\nz w\nv");
    }

    #[test]
    fn test_empty_input() {
        let words: Vec<(i64, &str)> = vec![];
        assert_eq!(reconstruct_text(words), "");
    }

    #[test]
    fn test_string_line_ids() {
        let words = vec![("a", "one"), ("a", "two"), ("b", "three")];
        assert_eq!(reconstruct_text(words), "one two\nthree");
    }

    #[test]
    fn test_format_page() {
        let regions = vec![region(1), region(1), region(1), region(2), region(2)];
        let texts = ["The", "quick", "fox", "jumps", "high"];
        assert_eq!(
            format_page(&regions, &texts).unwrap(),
            "The quick fox\njumps high"
        );
    }

    #[test]
    fn test_format_page_alignment_error() {
        let regions = vec![region(1), region(2)];
        let texts = ["only one"];
        assert_eq!(
            format_page(&regions, &texts),
            Err(AlignmentError { regions: 2, texts: 1 })
        );
    }
}
