/*!
 * WebVTT document model.
 *
 * A document is an ordered list of blocks. Every line of the source lands in
 * exactly one block, so rendering the blocks back in order reproduces the
 * source layout.
 */

/// A single cue: optional preamble lines, the timing line, and its text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueBlock {
    /// Lines before the timing line (usually the cue identifier)
    pub preamble: Vec<String>,

    /// The `HH:MM:SS.mmm --> HH:MM:SS.mmm` line, verbatim
    pub timing: String,

    /// Cue payload; the only region that gets translated
    pub text_lines: Vec<String>,
}

impl CueBlock {
    /// Create a cue without preamble lines
    pub fn new(timing: impl Into<String>, text_lines: Vec<String>) -> Self {
        Self {
            preamble: Vec::new(),
            timing: timing.into(),
            text_lines,
        }
    }

    /// Attach preamble lines such as a numeric cue identifier
    pub fn with_preamble(mut self, preamble: Vec<String>) -> Self {
        self.preamble = preamble;
        self
    }

    /// Number of lines the translated text must occupy.
    ///
    /// A cue with no text lines still owns one (possibly empty) output line.
    pub fn original_line_count(&self) -> usize {
        self.text_lines.len().max(1)
    }

    /// Text lines collapsed into one translation unit
    pub fn cue_text(&self) -> String {
        self.text_lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Copy of this cue with its text region replaced
    pub fn with_text_lines(&self, text_lines: Vec<String>) -> Self {
        Self {
            preamble: self.preamble.clone(),
            timing: self.timing.clone(),
            text_lines,
        }
    }

    fn lines(&self) -> impl Iterator<Item = &str> {
        self.preamble
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.timing.as_str()))
            .chain(self.text_lines.iter().map(String::as_str))
    }
}

/// Structural unit of a WebVTT document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `WEBVTT` line followed by its metadata lines
    Header(Vec<String>),

    /// A block carrying a timing line
    Cue(CueBlock),

    /// Non-blank lines without a timing line (NOTE, STYLE, stray text)
    Opaque(Vec<String>),

    /// One blank separator line, kept byte-for-byte
    Blank(String),
}

impl Block {
    /// The block's lines in output order
    pub fn lines(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        match self {
            Block::Header(lines) | Block::Opaque(lines) => Box::new(lines.iter().map(String::as_str)),
            Block::Cue(cue) => Box::new(cue.lines()),
            Block::Blank(line) => Box::new(std::iter::once(line.as_str())),
        }
    }

    pub fn as_cue(&self) -> Option<&CueBlock> {
        match self {
            Block::Cue(cue) => Some(cue),
            _ => None,
        }
    }
}

/// Parsed WebVTT document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Whether the document starts with a `WEBVTT` header block
    pub fn has_header(&self) -> bool {
        matches!(self.blocks.first(), Some(Block::Header(_)))
    }

    /// Cues in document order
    pub fn cues(&self) -> impl Iterator<Item = &CueBlock> {
        self.blocks.iter().filter_map(Block::as_cue)
    }

    pub fn cue_count(&self) -> usize {
        self.cues().count()
    }

    /// Build a new document whose n-th cue is replaced by `replacements[n]`.
    ///
    /// Non-cue blocks are carried over unchanged. Missing replacements keep
    /// the original cue.
    pub fn with_cues(&self, replacements: Vec<CueBlock>) -> Self {
        let mut replacements = replacements.into_iter();
        let blocks = self
            .blocks
            .iter()
            .map(|block| match block {
                Block::Cue(cue) => Block::Cue(replacements.next().unwrap_or_else(|| cue.clone())),
                other => other.clone(),
            })
            .collect();

        Self { blocks }
    }

    /// Serialize back to WebVTT text.
    ///
    /// Trailing blank lines are dropped and the output always ends with a
    /// single newline. This includes the empty text line of a final cue
    /// whose text is empty, so such a cue ends at its timing line.
    pub fn render(&self) -> String {
        let mut lines: Vec<&str> = self.blocks.iter().flat_map(Block::lines).collect();

        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            lines.pop();
        }

        let mut output = lines.join("\n");
        output.push('\n');
        output
    }
}
