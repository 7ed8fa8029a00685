//! # Code Block Segmentation
//!
//! Splits message text into plain-text runs and fenced code blocks so the
//! renderer can highlight code separately.
//!
//! ```text
//! "before ```js\ncode\n``` after"
//!   → Text("before ")
//!   → Code { language: "js", value: "code" }
//!   → Text(" after")
//! ```
//!
//! The parse is total and lossless: every input byte belongs to exactly one
//! segment, and concatenating [`Segment::source`] reproduces the input. It runs
//! against the *revealed* prefix on every frame, so a fence whose closing
//! marker hasn't been revealed yet stays plain text until it is.

const FENCE: &str = "```";
const DEFAULT_LANGUAGE: &str = "text";

/// A fenced code block with enough framing info to rebuild its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// First word of the fence tag, or `"text"` when untagged.
    pub language: String,
    /// Code body without fences, tag, or the newline before the closing fence.
    pub value: String,
    /// Raw tag exactly as written after the opening fence.
    pub tag: String,
    /// Whether a newline followed the opening fence line.
    pub open_newline: bool,
    /// Whether a newline preceded the closing fence.
    pub close_newline: bool,
}

impl CodeBlock {
    /// Rebuilds the fenced source for this block.
    pub fn source(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + self.tag.len() + 8);
        out.push_str(FENCE);
        out.push_str(&self.tag);
        if self.open_newline {
            out.push('\n');
        }
        out.push_str(&self.value);
        if self.close_newline {
            out.push('\n');
        }
        out.push_str(FENCE);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code(CodeBlock),
}

impl Segment {
    /// The exact input text this segment was parsed from.
    pub fn source(&self) -> String {
        match self {
            Segment::Text(t) => t.clone(),
            Segment::Code(block) => block.source(),
        }
    }
}

/// Splits `input` into text and code segments.
pub fn parse(input: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(start) = rest.find(FENCE) {
        let after_open = &rest[start + FENCE.len()..];
        match parse_block(after_open) {
            Some((block, consumed)) => {
                text.push_str(&rest[..start]);
                if !text.is_empty() {
                    segments.push(Segment::Text(std::mem::take(&mut text)));
                }
                segments.push(Segment::Code(block));
                rest = &after_open[consumed..];
            }
            None => {
                // Unterminated: everything from here on is plain text.
                break;
            }
        }
    }

    text.push_str(rest);
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    segments
}

/// Code bodies of every complete fenced block in `input`, in order.
pub fn code_blocks(input: &str) -> Vec<CodeBlock> {
    parse(input)
        .into_iter()
        .filter_map(|seg| match seg {
            Segment::Code(block) => Some(block),
            Segment::Text(_) => None,
        })
        .collect()
}

/// Parses a block whose opening fence has already been consumed.
/// Returns the block and the number of bytes of `s` it used, or `None` if the
/// closing fence is missing.
fn parse_block(s: &str) -> Option<(CodeBlock, usize)> {
    let line_end = s.find('\n');
    let same_line_close = s.find(FENCE);

    // Closing fence before any newline: inline block, no tag.
    if let Some(close) = same_line_close
        && line_end.is_none_or(|nl| close < nl)
    {
        let block = CodeBlock {
            language: DEFAULT_LANGUAGE.to_string(),
            value: s[..close].to_string(),
            tag: String::new(),
            open_newline: false,
            close_newline: false,
        };
        return Some((block, close + FENCE.len()));
    }

    let nl = line_end?;
    let tag = &s[..nl];
    let body_start = nl + 1;
    let close = body_start + s[body_start..].find(FENCE)?;

    let body = &s[body_start..close];
    let (value, close_newline) = match body.strip_suffix('\n') {
        Some(v) => (v, true),
        None => (body, false),
    };

    let language = tag
        .split_whitespace()
        .next()
        .unwrap_or(DEFAULT_LANGUAGE)
        .to_string();

    let block = CodeBlock {
        language,
        value: value.to_string(),
        tag: tag.to_string(),
        open_newline: true,
        close_newline,
    };
    Some((block, close + FENCE.len()))
}
