/*!
 * WebVTT splitter.
 *
 * Turns raw text into a [`Document`]. The splitter is total: any input is
 * accepted, and lines it cannot classify as cue content are carried through
 * as opaque blocks.
 */

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use super::document::{Block, CueBlock, Document};

// @const: WebVTT timing line, searched anywhere in the line
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{2}:\d{2}:\d{2}\.\d{3}\s+-->\s+\d{2}:\d{2}:\d{2}\.\d{3}")
        .expect("timestamp pattern is valid")
});

/// Whether a line carries a `HH:MM:SS.mmm --> HH:MM:SS.mmm` range
pub fn is_timing_line(line: &str) -> bool {
    TIMESTAMP_REGEX.is_match(line)
}

/// Whether the text looks like WebVTT at all: a `WEBVTT` signature or at
/// least one timing line
pub fn looks_like_webvtt(raw: &str) -> bool {
    raw.lines().next().is_some_and(is_header_line) || TIMESTAMP_REGEX.is_match(raw)
}

fn is_header_line(line: &str) -> bool {
    line.trim().to_uppercase().starts_with("WEBVTT")
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Classify a run of non-blank lines.
///
/// The first timing line wins; anything before it is preamble, anything
/// after it is cue text even if it looks like another timing line.
pub fn classify(lines: Vec<String>) -> Block {
    match lines.iter().position(|line| is_timing_line(line)) {
        Some(timing_idx) => {
            let mut preamble = lines;
            let mut text_lines = preamble.split_off(timing_idx);
            let timing = text_lines.remove(0);
            Block::Cue(CueBlock {
                preamble,
                timing,
                text_lines,
            })
        }
        None => Block::Opaque(lines),
    }
}

/// Split raw WebVTT text into a document
pub fn split(raw: &str) -> Document {
    let lines: Vec<&str> = raw.lines().collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    if lines.first().is_some_and(|line| is_header_line(line)) {
        let mut header = vec![lines[0].to_string()];
        i = 1;
        while i < lines.len() && !is_blank(lines[i]) {
            header.push(lines[i].to_string());
            i += 1;
        }
        blocks.push(Block::Header(header));
    }

    while i < lines.len() {
        if is_blank(lines[i]) {
            blocks.push(Block::Blank(lines[i].to_string()));
            i += 1;
            continue;
        }

        let mut run = Vec::new();
        while i < lines.len() && !is_blank(lines[i]) {
            run.push(lines[i].to_string());
            i += 1;
        }
        blocks.push(classify(run));
    }

    let document = Document::new(blocks);
    trace!(
        "Split WebVTT input into {} blocks ({} cues)",
        document.blocks.len(),
        document.cue_count()
    );
    document
}
