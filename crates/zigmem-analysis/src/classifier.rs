//! Lexical context classification.
//!
//! A single forward scan over the source text that tags every span as code,
//! comment, doc comment, or one of the string-literal forms. Downstream
//! checks use [`ContextClassifier::context_at`] to reject raw-text pattern
//! matches that land inside non-executable text.
//!
//! The classifier never fails: malformed input (unterminated comments or
//! strings) degrades to regions closed at a sentinel position.

use zigmem_core::types::{ContextKind, ContextRegion, UNTERMINATED};

use crate::patterns::is_ident_byte;

/// Classifies source text into [`ContextRegion`]s.
///
/// One instance is built per file; `analyze` may be called again to reuse
/// the allocation for another file.
#[derive(Debug, Default)]
pub struct ContextClassifier {
    regions: Vec<ContextRegion>,
}

impl ContextClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a classifier and analyze `source` in one step.
    pub fn analyze_source(source: &str) -> Self {
        let mut classifier = Self::new();
        classifier.analyze(source);
        classifier
    }

    /// Regions in emission order, stable until the next `analyze` call.
    pub fn regions(&self) -> &[ContextRegion] {
        &self.regions
    }

    /// Context kind at a position. Lines are 1-based, columns 0-based.
    ///
    /// Positions outside every region are code: classification fails open,
    /// because a false "code" answer merely lets a finding through while a
    /// false "comment" answer would suppress a real one.
    pub fn context_at(&self, line: u32, col: u32) -> ContextKind {
        let mut kind = ContextKind::Code;
        for region in &self.regions {
            if region.contains(line, col) {
                kind = region.kind;
            }
        }
        kind
    }

    pub fn is_code(&self, line: u32, col: u32) -> bool {
        self.context_at(line, col).is_code()
    }

    /// Scan `source` and rebuild the region list.
    pub fn analyze(&mut self, source: &str) {
        self.regions.clear();

        let mut in_block_comment = false;
        let mut block_start = (0u32, 0u32);
        let mut last_line = 0u32;

        for (idx, line) in source.lines().enumerate() {
            let line_no = idx as u32 + 1;
            last_line = line_no;
            let bytes = line.as_bytes();

            // Whitespace-only lines cannot change any state.
            if bytes.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }

            let mut i = 0usize;
            let mut in_string = false;
            let mut in_char = false;
            let mut literal_start = 0u32;

            while i < bytes.len() {
                let b = bytes[i];

                if in_block_comment {
                    if b == b'*' && bytes.get(i + 1) == Some(&b'/') {
                        self.push(
                            block_start.0,
                            block_start.1,
                            line_no,
                            (i + 2) as u32,
                            ContextKind::BlockComment,
                        );
                        in_block_comment = false;
                        i += 2;
                    } else {
                        i += 1;
                    }
                    continue;
                }

                if in_string || in_char {
                    if b == b'\\' {
                        // Escape consumes both characters atomically.
                        i += 2;
                        continue;
                    }
                    let delim = if in_string { b'"' } else { b'\'' };
                    if b == delim {
                        self.push(
                            line_no,
                            literal_start,
                            line_no,
                            (i + 1) as u32,
                            ContextKind::StringLiteral,
                        );
                        in_string = false;
                        in_char = false;
                    }
                    i += 1;
                    continue;
                }

                match b {
                    b'/' if bytes.get(i + 1) == Some(&b'/') => {
                        let kind = match bytes.get(i + 2) {
                            Some(b'/') | Some(b'!') => ContextKind::DocComment,
                            _ => ContextKind::LineComment,
                        };
                        self.push(line_no, i as u32, line_no, bytes.len() as u32, kind);
                        i = bytes.len();
                    }
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        in_block_comment = true;
                        block_start = (line_no, i as u32);
                        i += 2;
                    }
                    b'\\' if bytes.get(i + 1) == Some(&b'\\') => {
                        // Multiline string continuation: rest of the line.
                        self.push(
                            line_no,
                            i as u32,
                            line_no,
                            bytes.len() as u32,
                            ContextKind::MultilineString,
                        );
                        i = bytes.len();
                    }
                    b'r' if bytes.get(i + 1) == Some(&b'"')
                        && (i == 0 || !is_ident_byte(bytes[i - 1])) =>
                    {
                        let end = match line[i + 2..].find('"') {
                            Some(q) => i + 2 + q + 1,
                            None => bytes.len(),
                        };
                        self.push(
                            line_no,
                            i as u32,
                            line_no,
                            end as u32,
                            ContextKind::RawString,
                        );
                        i = end;
                    }
                    b'@' if line[i..].starts_with("@embedFile") => {
                        let end = embed_end(bytes, i + "@embedFile".len());
                        self.push(
                            line_no,
                            i as u32,
                            line_no,
                            end as u32,
                            ContextKind::EmbeddedFile,
                        );
                        i = end;
                    }
                    b'"' => {
                        in_string = true;
                        literal_start = i as u32;
                        i += 1;
                    }
                    b'\'' => {
                        in_char = true;
                        literal_start = i as u32;
                        i += 1;
                    }
                    _ => i += 1,
                }
            }

            // Unterminated string/char literal: emit up to the line's end
            // and recover on the next line.
            if in_string || in_char {
                self.push(
                    line_no,
                    literal_start,
                    line_no,
                    bytes.len() as u32,
                    ContextKind::StringLiteral,
                );
            }
        }

        // Unterminated block comment runs to end of input.
        if in_block_comment {
            self.push(
                block_start.0,
                block_start.1,
                last_line.max(block_start.0),
                UNTERMINATED,
                ContextKind::BlockComment,
            );
        }
    }

    fn push(&mut self, start_line: u32, start_col: u32, end_line: u32, end_col: u32, kind: ContextKind) {
        self.regions.push(ContextRegion {
            start_line,
            start_col,
            end_line,
            end_col,
            kind,
        });
    }
}

/// End offset (exclusive) of an `@embedFile(...)` span: balanced parens from
/// the token to its closing parenthesis, swallowing any nested quoting. An
/// unbalanced call runs to the end of the line.
fn embed_end(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'(') {
        return i;
    }
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
