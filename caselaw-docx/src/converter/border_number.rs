//! Border number post-processing
//!
//! The converter emits a flat sequence. Consecutive list entries are grouped
//! into lists first, then every element following a border number becomes
//! part of that border number until a break condition is met. Border
//! numbers without literal text are numbered last.

use crate::diagnostics::Diagnostics;
use crate::document_model::{DocumentElement, NumberingList, NumberingListEntry};
use regex::Regex;
use std::sync::OnceLock;

/// Outline headings such as `II.` end the current border number
static ROMAN_HEADING: OnceLock<Option<Regex>> = OnceLock::new();

fn is_roman_heading(text: &str) -> bool {
    ROMAN_HEADING
        .get_or_init(|| Regex::new(r"^[IVXLCDM]+\.$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(text.trim()))
}

/// Group, nest and number a converted element sequence
pub fn post_process(
    elements: Vec<DocumentElement>,
    diagnostics: &mut Diagnostics,
) -> Vec<DocumentElement> {
    let mut elements = nest_border_numbers(group_lists(elements));
    number_border_numbers(&mut elements, diagnostics);
    elements
}

/// Replace every maximal run of list entries by one list
pub fn group_lists(elements: Vec<DocumentElement>) -> Vec<DocumentElement> {
    let mut output = Vec::with_capacity(elements.len());
    let mut pending: Vec<NumberingListEntry> = Vec::new();

    for element in elements {
        match element {
            DocumentElement::NumberingListEntry(entry) => pending.push(entry),
            other => {
                flush_list(&mut pending, &mut output);
                output.push(other);
            }
        }
    }
    flush_list(&mut pending, &mut output);
    output
}

fn flush_list(pending: &mut Vec<NumberingListEntry>, output: &mut Vec<DocumentElement>) {
    if !pending.is_empty() {
        output.push(DocumentElement::NumberingList(NumberingList::new(
            std::mem::take(pending),
        )));
    }
}

/// Move the elements following a border number into it
///
/// Border numbers always stay at the top level. The current border number
/// ends at a centered paragraph or a roman numeral heading, and the last
/// border number of the document takes a single element only.
pub fn nest_border_numbers(elements: Vec<DocumentElement>) -> Vec<DocumentElement> {
    let last = elements
        .iter()
        .rposition(|e| matches!(e, DocumentElement::BorderNumber(_)));
    let mut output: Vec<DocumentElement> = Vec::with_capacity(elements.len());
    let mut cursor: Option<usize> = None;
    let mut cursor_is_last = false;

    for (index, element) in elements.into_iter().enumerate() {
        if matches!(element, DocumentElement::BorderNumber(_)) {
            output.push(element);
            cursor = Some(output.len() - 1);
            cursor_is_last = Some(index) == last;
            continue;
        }

        if let Some(position) = cursor {
            let last_is_filled = cursor_is_last
                && matches!(&output[position], DocumentElement::BorderNumber(b) if !b.children.is_empty());
            if last_is_filled || ends_border_number(&element) {
                cursor = None;
            }
        }

        if let Some(position) = cursor {
            if let DocumentElement::BorderNumber(border_number) = &mut output[position] {
                border_number.children.push(element);
                continue;
            }
        }
        output.push(element);
    }

    output
}

fn ends_border_number(element: &DocumentElement) -> bool {
    if let DocumentElement::Paragraph(paragraph) = element {
        if paragraph.is_centered() {
            return true;
        }
    }
    element
        .as_paragraph()
        .is_some_and(|paragraph| is_roman_heading(&paragraph.text()))
}

/// Number border numbers without literal text with one running counter
///
/// Counting continues across numbering definitions; a border number from a
/// different numbering than the first one is reported once per numbering.
pub fn number_border_numbers(elements: &mut [DocumentElement], diagnostics: &mut Diagnostics) {
    let mut counter = 0u32;
    let mut first_numbering: Option<Option<String>> = None;
    let mut reported: Vec<Option<String>> = Vec::new();

    for element in elements.iter_mut() {
        let DocumentElement::BorderNumber(border_number) = element else {
            continue;
        };
        if !border_number.number.is_empty() {
            continue;
        }
        counter += 1;
        border_number.number = counter.to_string();

        let numbering = &border_number.numbering_id;
        match &first_numbering {
            None => first_numbering = Some(numbering.clone()),
            Some(first) if first != numbering && !reported.contains(numbering) => {
                diagnostics.warn(format!(
                    "Border number {} uses numbering {:?} instead of {:?}, counting continues",
                    counter, numbering, first
                ));
                reported.push(numbering.clone());
            }
            Some(_) => {}
        }
    }
}
