/*!
 * Tests for splitting, classifying and rendering WebVTT documents
 */

use vtt_translate::webvtt::{self, Block, CueBlock, Document};

fn lines(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_split_withHeaderAndMetadata_shouldGroupHeaderLines() {
    let document = webvtt::split("WEBVTT - lecture\nKind: captions\n\n00:00:01.000 --> 00:00:02.000\nHi\n");

    assert!(document.has_header());
    assert_eq!(
        document.blocks[0],
        Block::Header(lines(&["WEBVTT - lecture", "Kind: captions"]))
    );
    assert_eq!(document.blocks[1], Block::Blank(String::new()));
    assert_eq!(document.cue_count(), 1);
}

#[test]
fn test_split_withoutHeader_shouldStillFindCues() {
    let document = webvtt::split("1\n00:00:01.000 --> 00:00:02.000\nHello\n");

    assert!(!document.has_header());
    let cue = document.cues().next().unwrap();
    assert_eq!(cue.preamble, vec!["1"]);
    assert_eq!(cue.text_lines, vec!["Hello"]);
}

#[test]
fn test_split_withNoteAndStyle_shouldKeepThemOpaque() {
    let raw = "WEBVTT\n\nNOTE this is a comment\nspanning two lines\n\nSTYLE\n::cue { color: red }\n\n00:00:01.000 --> 00:00:02.000\nHi\n";
    let document = webvtt::split(raw);

    let opaque: Vec<&Block> = document
        .blocks
        .iter()
        .filter(|block| matches!(block, Block::Opaque(_)))
        .collect();

    assert_eq!(opaque.len(), 2);
    assert_eq!(
        *opaque[0],
        Block::Opaque(lines(&["NOTE this is a comment", "spanning two lines"]))
    );
}

#[test]
fn test_split_withConsecutiveBlankLines_shouldKeepEachOne() {
    let raw = "WEBVTT\n\n\n\n00:00:01.000 --> 00:00:02.000\nHi\n";
    let document = webvtt::split(raw);

    let blanks = document
        .blocks
        .iter()
        .filter(|block| matches!(block, Block::Blank(_)))
        .count();

    assert_eq!(blanks, 3);
    assert_eq!(document.render(), raw);
}

#[test]
fn test_split_withWhitespaceOnlyLine_shouldStoreItVerbatim() {
    let document = webvtt::split("WEBVTT\n  \t\n00:00:01.000 --> 00:00:02.000\nHi\n");
    assert_eq!(document.blocks[1], Block::Blank("  \t".to_string()));
}

#[test]
fn test_split_withCrlfLineEndings_shouldMatchLf() {
    let lf = webvtt::split("WEBVTT\n\n1\n00:00:01.000 --> 00:00:02.000\nHi\n");
    let crlf = webvtt::split("WEBVTT\r\n\r\n1\r\n00:00:01.000 --> 00:00:02.000\r\nHi\r\n");
    assert_eq!(lf, crlf);
}

#[test]
fn test_split_emptyInput_shouldHaveNoBlocks() {
    let document = webvtt::split("");
    assert!(document.blocks.is_empty());
    assert_eq!(document.render(), "\n");
}

#[test]
fn test_classify_withIdentifierAndSettings_shouldSplitPreamble() {
    let block = webvtt::classify(lines(&[
        "intro-1",
        "00:00:01.000 --> 00:00:02.500 position:10% align:start",
        "First line",
        "Second line",
    ]));

    let Block::Cue(cue) = block else {
        panic!("expected a cue block");
    };
    assert_eq!(cue.preamble, vec!["intro-1"]);
    assert_eq!(cue.timing, "00:00:01.000 --> 00:00:02.500 position:10% align:start");
    assert_eq!(cue.text_lines, vec!["First line", "Second line"]);
}

#[test]
fn test_classify_withSecondTimingLine_shouldTreatItAsText() {
    let block = webvtt::classify(lines(&[
        "00:00:01.000 --> 00:00:02.000",
        "00:00:03.000 --> 00:00:04.000",
    ]));

    assert_eq!(
        block,
        Block::Cue(CueBlock::new(
            "00:00:01.000 --> 00:00:02.000",
            lines(&["00:00:03.000 --> 00:00:04.000"])
        ))
    );
}

#[test]
fn test_classify_withShortTimestamps_shouldBeOpaque() {
    let block = webvtt::classify(lines(&["01:02.000 --> 01:04.000", "Hi"]));
    assert!(matches!(block, Block::Opaque(_)));
}

#[test]
fn test_isTimingLine_withVariousSpacing_shouldMatch() {
    assert!(webvtt::is_timing_line("00:00:01.000 --> 00:00:02.000"));
    assert!(webvtt::is_timing_line("00:00:01.000\t-->   00:00:02.000"));
    assert!(webvtt::is_timing_line("x 00:00:01.000 --> 00:00:02.000 line:0"));
    assert!(!webvtt::is_timing_line("00:00:01,000 --> 00:00:02,000"));
    assert!(!webvtt::is_timing_line("00:00:01.000->00:00:02.000"));
}

#[test]
fn test_looksLikeWebvtt_shouldAcceptHeaderOrTimings() {
    assert!(webvtt::looks_like_webvtt("webvtt\n"));
    assert!(webvtt::looks_like_webvtt("1\n00:00:01.000 --> 00:00:02.000\nHi"));
    assert!(!webvtt::looks_like_webvtt("1\n00:00:01,000 --> 00:00:02,000\nHi"));
}

#[test]
fn test_render_shouldDropTrailingBlankLines() {
    let document = webvtt::split("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n\n\n");
    assert_eq!(document.render(), "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi\n");
}

#[test]
fn test_render_withoutTrailingNewline_shouldAddOne() {
    let document = webvtt::split("WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nHi");
    assert!(document.render().ends_with("Hi\n"));
}

#[test]
fn test_withCues_shouldReplaceCuesInOrder() {
    let document = webvtt::split(
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nOne\n\nNOTE keep\n\n00:00:03.000 --> 00:00:04.000\nTwo\n",
    );
    let replaced: Vec<CueBlock> = document
        .cues()
        .map(|cue| cue.with_text_lines(vec![cue.cue_text().to_uppercase()]))
        .collect();

    let rendered = document.with_cues(replaced).render();
    assert_eq!(
        rendered,
        "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\nONE\n\nNOTE keep\n\n00:00:03.000 --> 00:00:04.000\nTWO\n"
    );
}

#[test]
fn test_cueText_shouldJoinTrimmedNonEmptyLines() {
    let cue = CueBlock::new("00:00:01.000 --> 00:00:02.000", lines(&["  Hello ", "", " world"]));
    assert_eq!(cue.cue_text(), "Hello world");
    assert_eq!(cue.original_line_count(), 3);
}

#[test]
fn test_documentNew_shouldRenderGivenBlocks() {
    let document = Document::new(vec![
        Block::Header(lines(&["WEBVTT"])),
        Block::Blank(String::new()),
        Block::Cue(CueBlock::new("00:00:01.000 --> 00:00:02.000", vec![])),
    ]);
    assert_eq!(document.render(), "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n");
}
