//! Recursive character text splitter with overlap
//!
//! Splits on progressively finer boundaries (paragraphs, then sentences,
//! then words) and hard-cuts at character level only as a last resort, so
//! no chunk ever exceeds the configured size.

use unicode_segmentation::UnicodeSegmentation;

/// Text splitter with configurable size and overlap
pub struct RecursiveTextSplitter {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl RecursiveTextSplitter {
    /// Create a new splitter
    ///
    /// `overlap` is clamped below `chunk_size` so splitting always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    /// Split text into chunks of at most `chunk_size` characters
    ///
    /// Deterministic for fixed settings; empty and whitespace-only input
    /// produces no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.len() <= self.chunk_size {
            return vec![text.to_string()];
        }

        let fragments = self.fragment(text);
        self.merge_fragments(&fragments)
    }

    /// Break text into fragments no larger than `chunk_size`
    ///
    /// Paragraph pieces that still exceed the target are re-split at
    /// sentence bounds, then word bounds, then hard character cuts.
    fn fragment<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut fragments = Vec::new();

        for paragraph in split_keeping_separator(text, "\n\n") {
            if paragraph.len() <= self.chunk_size {
                fragments.push(paragraph);
                continue;
            }

            for sentence in paragraph.split_sentence_bounds() {
                if sentence.len() <= self.chunk_size {
                    fragments.push(sentence);
                    continue;
                }

                for word in sentence.split_word_bounds() {
                    if word.len() <= self.chunk_size {
                        fragments.push(word);
                    } else {
                        // Pathological unbroken run, cut at char boundaries
                        fragments.extend(hard_cut(word, self.chunk_size));
                    }
                }
            }
        }

        fragments
    }

    /// Merge fragments into chunks, carrying overlap between them
    fn merge_fragments(&self, fragments: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for fragment in fragments {
            if !current.is_empty() && current.len() + fragment.len() > self.chunk_size {
                let finished = current.trim().to_string();
                let tail = self.overlap_tail(&current);

                if !finished.is_empty() {
                    chunks.push(finished);
                }

                current = tail;
                // The carried tail plus a large fragment may still overflow;
                // drop the tail rather than exceed the size bound.
                if current.len() + fragment.len() > self.chunk_size {
                    current.clear();
                }
            }
            current.push_str(fragment);
        }

        let finished = current.trim().to_string();
        if !finished.is_empty() {
            chunks.push(finished);
        }

        chunks
    }

    /// Take the trailing `overlap` characters, starting at a word boundary
    fn overlap_tail(&self, text: &str) -> String {
        if self.overlap == 0 {
            return String::new();
        }
        if text.len() <= self.overlap {
            return text.to_string();
        }

        let mut start = text.len() - self.overlap;
        while start > 0 && !text.is_char_boundary(start) {
            start -= 1;
        }

        let tail = &text[start..];

        // Prefer starting the overlap at a word boundary
        match tail.find(' ') {
            Some(pos) if pos + 1 < tail.len() => tail[pos + 1..].to_string(),
            _ => tail.to_string(),
        }
    }
}

/// Split on a separator, keeping the separator attached to the preceding piece
fn split_keeping_separator<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(sep) {
        let end = pos + sep.len();
        pieces.push(&rest[..end]);
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest);
    }

    pieces
}

/// Hard cut at character boundaries, each piece at most `max_len` bytes
fn hard_cut(text: &str, max_len: usize) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            break;
        }
        pieces.push(&text[start..end]);
        start = end;
    }

    pieces
}
