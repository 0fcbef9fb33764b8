/*!
 * Cue and document translation.
 *
 * - `redistribute`: spreads a translated text over a fixed number of lines
 * - `cue`: translates the text region of a single cue
 * - `engine`: translates whole documents with bounded concurrency
 * - `cache`: caching decorator for any translator
 */

// Re-export main types for easier usage
pub use self::cache::{CachingTranslator, TranslationCache};
pub use self::cue::{CueOutcome, translate_cue};
pub use self::engine::{CueFailure, EngineOptions, TranslationReport, VttTranslator};
pub use self::redistribute::{redistribute, split_sentences};

// Submodules
pub mod cache;
pub mod cue;
pub mod engine;
pub mod redistribute;
