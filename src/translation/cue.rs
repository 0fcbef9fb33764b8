/*!
 * Single-cue translation.
 *
 * One cue is one backend call at most: the text lines are joined, sent once,
 * and the answer is spread back over the original number of lines.
 */

use log::debug;

use crate::errors::ProviderError;
use crate::providers::Translator;
use crate::webvtt::CueBlock;

use super::redistribute::redistribute;

/// Outcome of translating one cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueOutcome {
    /// The backend was called and its answer redistributed
    Translated(CueBlock),
    /// The cue had no text; no backend call was made
    Skipped(CueBlock),
}

impl CueOutcome {
    pub fn into_cue(self) -> CueBlock {
        match self {
            Self::Translated(cue) | Self::Skipped(cue) => cue,
        }
    }

    pub fn was_translated(&self) -> bool {
        matches!(self, Self::Translated(_))
    }
}

/// Translate one cue's text region.
///
/// Preamble and timing lines are copied unchanged. An empty answer for
/// non-empty input is reported as [`ProviderError::EmptyResponse`].
pub async fn translate_cue<T>(cue: &CueBlock, translator: &T) -> Result<CueOutcome, ProviderError>
where
    T: Translator + ?Sized,
{
    let line_count = cue.original_line_count();
    let cue_text = cue.cue_text();

    if cue_text.is_empty() {
        return Ok(CueOutcome::Skipped(cue.with_text_lines(vec![String::new(); line_count])));
    }

    let translated = translator.translate(&cue_text).await?;
    let translated = translated.trim();
    if translated.is_empty() {
        return Err(ProviderError::EmptyResponse);
    }

    let lines = redistribute(translated, line_count);
    debug!("Cue at {} -> {} line(s)", cue.timing, lines.len());

    Ok(CueOutcome::Translated(cue.with_text_lines(lines)))
}
