/*!
 * WebVTT structure handling.
 *
 * - `document`: block model and rendering
 * - `parser`: splitting raw text into blocks and classifying cues
 */

pub mod document;
pub mod parser;

pub use self::document::{Block, CueBlock, Document};
pub use self::parser::{classify, is_timing_line, looks_like_webvtt, split};
