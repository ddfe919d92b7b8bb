//! Manual hyphenation reconstruction
//!
//! The authoring tool stores a manually inserted hyphen as a soft hyphen
//! next to a non-breaking space, either inside one text item or split over
//! two adjacent ones. Both orders render as a plain hyphen followed by the
//! non-breaking space.

use crate::source_model::{Paragraph, ParagraphContent, RunContent};

const SOFT_HYPHEN: char = '\u{AD}';
const NO_BREAK_SPACE: char = '\u{A0}';
const HYPHEN_WITH_SPACE: &str = "-\u{A0}";

/// Rewrite soft hyphen and non-breaking space pairs in place
pub fn reconstruct_hyphens(paragraph: &mut Paragraph) {
    let mut texts: Vec<&mut String> = Vec::new();
    collect_texts(&mut paragraph.content, &mut texts);

    for text in texts.iter_mut() {
        if text.contains(SOFT_HYPHEN) {
            **text = text
                .replace("\u{AD}\u{A0}", HYPHEN_WITH_SPACE)
                .replace("\u{A0}\u{AD}", HYPHEN_WITH_SPACE);
        }
    }

    for i in 1..texts.len() {
        let (before, after) = texts.split_at_mut(i);
        let previous = &mut before[i - 1];
        let next = &mut after[0];

        if previous.ends_with(SOFT_HYPHEN) && next.starts_with(NO_BREAK_SPACE) {
            previous.pop();
            previous.push('-');
        } else if previous.ends_with(NO_BREAK_SPACE) && next.starts_with(SOFT_HYPHEN) {
            previous.pop();
            previous.push_str(HYPHEN_WITH_SPACE);
            next.remove(0);
        }
    }
}

/// Text items of all runs in document order, including hyperlinked runs
fn collect_texts<'p>(content: &'p mut [ParagraphContent], texts: &mut Vec<&'p mut String>) {
    for item in content.iter_mut() {
        match item {
            ParagraphContent::Run(run) => {
                for run_content in run.content.iter_mut() {
                    if let RunContent::Text(text) = run_content {
                        texts.push(text);
                    }
                }
            }
            ParagraphContent::Hyperlink(link) => collect_texts(&mut link.content, texts),
            ParagraphContent::Other(_) => {}
        }
    }
}
