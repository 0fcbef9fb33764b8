/*!
 * Line redistribution.
 *
 * A cue is translated as one string but must come back on exactly as many
 * lines as the source cue used. Sentence boundaries decide where the
 * translated text is cut.
 *
 * When there are more sentences than lines, leftover sentences are merged
 * into the last line. When there are fewer, the last sentence is repeated
 * to fill the remaining lines. Both are approximations: they keep the line
 * count exact but do not guarantee that each line carries the meaning of
 * the source line it replaces.
 */

/// Collapse any line breaks in `text` into single spaces.
///
/// A backend may reflow its answer over several lines; those breaks must
/// not leak into the cue layout.
pub fn flatten_line_breaks(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split text after `.`, `!` or `?` when followed by whitespace.
///
/// The whitespace run at each boundary is consumed; empty segments are
/// dropped.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            let segment = &text[start..idx];
            if !segment.is_empty() {
                segments.push(segment.to_string());
            }

            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next_ch)) = chars.peek() {
                if !next_ch.is_whitespace() {
                    break;
                }
                end = next_idx + next_ch.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }

    let tail = &text[start..];
    if !tail.is_empty() {
        segments.push(tail.to_string());
    }

    segments
}

/// Spread `translated` over exactly `line_count` lines.
///
/// A `line_count` of zero is treated as one.
pub fn redistribute(translated: &str, line_count: usize) -> Vec<String> {
    let line_count = line_count.max(1);
    let flattened = flatten_line_breaks(translated);

    if line_count == 1 {
        return vec![flattened];
    }

    let segments = split_sentences(&flattened);

    let lines = if segments.is_empty() {
        vec![String::new(); line_count]
    } else if segments.len() >= line_count {
        group_segments(&segments, line_count)
    } else {
        pad_segments(segments, line_count)
    };

    lines.into_iter().map(|line| line.trim().to_string()).collect()
}

// Equal-sized groups in order; leftovers are merged into the last group
fn group_segments(segments: &[String], line_count: usize) -> Vec<String> {
    let per_line = (segments.len() / line_count).max(1);

    let mut lines: Vec<String> = segments
        .chunks(per_line)
        .take(line_count)
        .map(|chunk| chunk.join(" "))
        .collect();

    let consumed = per_line * line_count;
    if consumed < segments.len() {
        if let Some(last) = lines.last_mut() {
            last.push(' ');
            last.push_str(&segments[consumed..].join(" "));
        }
    }

    lines
}

// One segment per line, then the last segment repeated
fn pad_segments(mut segments: Vec<String>, line_count: usize) -> Vec<String> {
    if let Some(last) = segments.last().cloned() {
        segments.resize(line_count, last);
    }
    segments
}
