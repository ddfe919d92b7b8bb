//! Numbered and bulleted lists
//!
//! The source format stores no list item text. Every entry carries the
//! resolved level definition of its paragraph and [`NumberingList::to_html`]
//! reconstructs nesting and marker text from the entry sequence.

use super::paragraph::{ParagraphElement, TAB_GLYPH};
use crate::style::StyleMap;

/// Letters used for letter numbering; counters past the end wrap around
const LOWER_LETTERS: [char; 30] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's',
    't', 'u', 'v', 'w', 'x', 'y', 'z', 'ä', 'ö', 'ü', 'ß',
];
const UPPER_LETTERS: [char; 30] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'Ä', 'Ö', 'Ü', 'ẞ',
];

/// Highest placeholder index in a level text template (`%9`)
const MAX_PLACEHOLDER: usize = 9;

/// Deepest list level a document can define
pub const MAX_LEVEL: usize = MAX_PLACEHOLDER - 1;

/// Marker format of a list level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberFormat {
    #[default]
    Bullet,
    Decimal,
    UpperLetter,
    LowerLetter,
    UpperRoman,
    LowerRoman,
}

impl NumberFormat {
    /// Map a `w:numFmt` value
    ///
    /// Decimal variants (`decimalZero`, `ordinal`, ...) and unknown values
    /// map to [`NumberFormat::Decimal`]; `none` renders like a bullet list.
    pub fn parse(value: &str) -> Self {
        match value {
            "bullet" | "none" => NumberFormat::Bullet,
            "upperLetter" => NumberFormat::UpperLetter,
            "lowerLetter" => NumberFormat::LowerLetter,
            "upperRoman" => NumberFormat::UpperRoman,
            "lowerRoman" => NumberFormat::LowerRoman,
            _ => NumberFormat::Decimal,
        }
    }

    /// Format a counter value
    pub fn format(self, value: u32) -> String {
        match self {
            NumberFormat::Bullet | NumberFormat::Decimal => value.to_string(),
            NumberFormat::UpperLetter => letter(value, &UPPER_LETTERS),
            NumberFormat::LowerLetter => letter(value, &LOWER_LETTERS),
            NumberFormat::UpperRoman => roman(value),
            NumberFormat::LowerRoman => roman(value).to_lowercase(),
        }
    }

    fn list_tag(self) -> &'static str {
        match self {
            NumberFormat::Bullet => "ul",
            _ => "ol",
        }
    }
}

fn letter(value: u32, alphabet: &[char; 30]) -> String {
    let index = (value.max(1) - 1) as usize % alphabet.len();
    alphabet[index].to_string()
}

fn roman(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut result = String::new();
    for (amount, numeral) in NUMERALS {
        while value >= amount {
            result.push_str(numeral);
            value -= amount;
        }
    }
    result
}

/// What follows the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberingSuffix {
    #[default]
    Tab,
    Space,
    Nothing,
}

impl NumberingSuffix {
    /// Map a `w:suff` value; unknown values fall back to a tab
    pub fn parse(value: &str) -> Self {
        match value {
            "space" => NumberingSuffix::Space,
            "nothing" => NumberingSuffix::Nothing,
            _ => NumberingSuffix::Tab,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            NumberingSuffix::Tab => TAB_GLYPH,
            NumberingSuffix::Space => " ",
            NumberingSuffix::Nothing => "",
        }
    }
}

/// Resolved level definition of a list entry
#[derive(Debug, Clone, PartialEq)]
pub struct NumberingListEntryIndex {
    pub format: NumberFormat,
    pub suffix: NumberingSuffix,
    /// Marker justification as written in the source
    pub justification: Option<String>,
    /// Level text template such as `%1.%2.`, or the bullet character
    pub level_text: String,
    /// Start value of the level
    pub start: u32,
    /// `w:lvlRestart` value; `0` continues counting after a higher level
    pub restart: Option<u32>,
    /// Legal numbering, all placeholders render as decimals
    pub legal: bool,
    pub color: Option<String>,
    /// Marker font size in points
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    /// Zero based level as written in the source
    pub level: String,
}

impl Default for NumberingListEntryIndex {
    fn default() -> Self {
        Self {
            format: NumberFormat::Bullet,
            suffix: NumberingSuffix::Tab,
            justification: None,
            level_text: String::new(),
            start: 1,
            restart: None,
            legal: false,
            color: None,
            font_size: None,
            font_family: None,
            level: "0".to_string(),
        }
    }
}

impl NumberingListEntryIndex {
    /// Numeric level, `0` when the source value is malformed and at most
    /// [`MAX_LEVEL`]
    pub fn level_number(&self) -> usize {
        self.level
            .trim()
            .parse::<usize>()
            .map_or(0, |level| level.min(MAX_LEVEL))
    }

    /// Bullet glyph for the declared marker font
    pub fn bullet_glyph(&self) -> &'static str {
        match self.font_family.as_deref() {
            Some("Courier New") => "\u{25E6}",
            Some("Wingdings") => "\u{25AA}",
            _ => "\u{2022}",
        }
    }

    fn marker_style(&self) -> StyleMap {
        let mut style = StyleMap::new();
        if let Some(color) = &self.color {
            style.set("color", color.clone());
        }
        if let Some(size) = self.font_size {
            style.set("font-size", format!("{}pt", size));
        }
        if let Some(font) = &self.font_family {
            style.set("font-family", format!("'{}'", font));
        }
        style
    }
}

/// A paragraph with list numbering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberingListEntry {
    pub paragraph: ParagraphElement,
    pub index: NumberingListEntryIndex,
}

/// Consecutive list entries, rendered as nested `<ol>`/`<ul>` markup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberingList {
    pub entries: Vec<NumberingListEntry>,
}

impl NumberingList {
    /// Group entries into a list
    pub fn new(entries: Vec<NumberingListEntry>) -> Self {
        Self { entries }
    }

    /// Render the list with reconstructed nesting and markers
    pub fn to_html(&self) -> String {
        let mut renderer = ListRenderer::default();
        for entry in &self.entries {
            renderer.push(entry);
        }
        renderer.finish()
    }
}

/// Counter state of one level
#[derive(Debug, Clone, Copy, Default)]
struct LevelState {
    counter: u32,
    format: NumberFormat,
    /// Counter kept from the last time the level was closed
    suspended: Option<u32>,
    just_opened: bool,
}

#[derive(Debug, Default)]
struct ListRenderer {
    html: String,
    /// Close tags of the open levels, innermost last
    open_tags: Vec<&'static str>,
    /// Format of the current top-level list
    active_format: Option<NumberFormat>,
    /// Level of the previous entry
    last_level: Option<usize>,
    levels: Vec<LevelState>,
}

impl ListRenderer {
    fn push(&mut self, entry: &NumberingListEntry) {
        let index = &entry.index;
        let level = index.level_number();

        if self.starts_new_list(level, index.format) {
            self.close_all();
            self.levels.clear();
            self.active_format = Some(index.format);
            self.open_level(index.format);
        }
        while self.open_tags.len() <= level {
            self.open_level(index.format);
        }
        while self.open_tags.len() > level + 1 {
            self.close_level();
        }

        self.last_level = Some(level);
        self.advance_counter(level, index);
        let marker = self.marker(level, index);

        let prefix = format!(
            "<span{}>{}</span>{}",
            index.marker_style().to_attribute(),
            super::escape_html(&marker),
            index.suffix.as_str()
        );
        self.html.push_str("<li>");
        self.html
            .push_str(&entry.paragraph.to_html_with_prefix(&prefix));
        self.html.push_str("</li>");
    }

    fn starts_new_list(&self, level: usize, format: NumberFormat) -> bool {
        if self.open_tags.is_empty() {
            return true;
        }
        level == 0
            && (self.active_format != Some(format)
                || (format == NumberFormat::Bullet && self.last_level == Some(0)))
    }

    fn open_level(&mut self, format: NumberFormat) {
        let tag = format.list_tag();
        self.html
            .push_str(&format!("<{} style=\"list-style-type: none;\">", tag));
        self.open_tags.push(tag);
        let depth = self.open_tags.len() - 1;
        if self.levels.len() <= depth {
            self.levels.resize(depth + 1, LevelState::default());
        }
        self.levels[depth].just_opened = true;
    }

    fn close_level(&mut self) {
        if let Some(tag) = self.open_tags.pop() {
            self.html.push_str(&format!("</{}>", tag));
            let depth = self.open_tags.len();
            if let Some(state) = self.levels.get_mut(depth) {
                state.suspended = Some(state.counter);
                state.counter = 0;
            }
        }
    }

    fn close_all(&mut self) {
        while !self.open_tags.is_empty() {
            self.close_level();
        }
    }

    fn advance_counter(&mut self, level: usize, index: &NumberingListEntryIndex) {
        let state = &mut self.levels[level];
        state.format = if index.legal {
            NumberFormat::Decimal
        } else {
            index.format
        };
        if state.just_opened {
            state.just_opened = false;
            state.counter = match (index.restart, state.suspended) {
                (Some(0), Some(previous)) => previous.saturating_add(1),
                _ => index.start,
            };
        } else {
            state.counter = state.counter.saturating_add(1);
        }
    }

    fn marker(&self, level: usize, index: &NumberingListEntryIndex) -> String {
        if index.format == NumberFormat::Bullet {
            return index.bullet_glyph().to_string();
        }
        if index.level_text.is_empty() {
            let state = &self.levels[level];
            return state.format.format(state.counter);
        }
        let mut marker = index.level_text.clone();
        for placeholder in (1..=MAX_PLACEHOLDER).rev() {
            let token = format!("%{}", placeholder);
            if !marker.contains(&token) {
                continue;
            }
            let value = match self.levels.get(placeholder - 1) {
                Some(state) => {
                    let format = if index.legal {
                        NumberFormat::Decimal
                    } else {
                        state.format
                    };
                    format.format(state.counter)
                }
                None => String::new(),
            };
            marker = marker.replace(&token, &value);
        }
        marker
    }

    fn finish(mut self) -> String {
        self.close_all();
        self.html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::{RunElement, TextElement};

    fn entry(level: u32, format: NumberFormat, template: &str, text: &str) -> NumberingListEntry {
        NumberingListEntry {
            paragraph: ParagraphElement {
                runs: vec![RunElement::Text(TextElement::new(text))],
                ..ParagraphElement::default()
            },
            index: NumberingListEntryIndex {
                format,
                level_text: template.to_string(),
                level: level.to_string(),
                ..NumberingListEntryIndex::default()
            },
        }
    }

    fn markers(html: &str) -> Vec<String> {
        html.split("<span>")
            .skip(1)
            .filter_map(|part| part.split("</span>").next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_nested_decimal_markers() {
        let list = NumberingList::new(vec![
            entry(0, NumberFormat::Decimal, "%1.", "a"),
            entry(1, NumberFormat::Decimal, "%1.%2.", "b"),
            entry(0, NumberFormat::Decimal, "%1.", "c"),
        ]);
        assert_eq!(markers(&list.to_html()), vec!["1.", "1.1.", "2."]);
    }

    #[test]
    fn test_open_and_close_tags_balance() {
        let list = NumberingList::new(
            [0, 0, 1, 1, 0]
                .into_iter()
                .map(|level| entry(level, NumberFormat::Decimal, "%1.", "x"))
                .collect(),
        );
        let html = list.to_html();
        assert_eq!(html.matches("<ol").count(), 2);
        assert_eq!(html.matches("</ol>").count(), 2);
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn test_level_reopens_with_start_value() {
        let list = NumberingList::new(vec![
            entry(0, NumberFormat::Decimal, "%1.", "a"),
            entry(1, NumberFormat::LowerLetter, "%2)", "b"),
            entry(1, NumberFormat::LowerLetter, "%2)", "c"),
            entry(0, NumberFormat::Decimal, "%1.", "d"),
            entry(1, NumberFormat::LowerLetter, "%2)", "e"),
        ]);
        assert_eq!(
            markers(&list.to_html()),
            vec!["1.", "a)", "b)", "2.", "a)"]
        );
    }

    #[test]
    fn test_restart_zero_continues_counting() {
        let mut nested = entry(1, NumberFormat::Decimal, "%2.", "b");
        nested.index.restart = Some(0);
        let list = NumberingList::new(vec![
            entry(0, NumberFormat::Decimal, "%1.", "a"),
            nested.clone(),
            entry(0, NumberFormat::Decimal, "%1.", "c"),
            nested,
        ]);
        assert_eq!(markers(&list.to_html()), vec!["1.", "1.", "2.", "2."]);
    }

    #[test]
    fn test_format_change_starts_new_list() {
        let list = NumberingList::new(vec![
            entry(0, NumberFormat::Decimal, "%1.", "a"),
            entry(0, NumberFormat::Bullet, "", "b"),
        ]);
        let html = list.to_html();
        assert!(html.starts_with("<ol"));
        assert!(html.contains("</ol><ul"));
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn test_top_level_bullet_after_top_level_entry_starts_new_list() {
        let list = NumberingList::new(vec![
            entry(0, NumberFormat::Bullet, "", "a"),
            entry(1, NumberFormat::Bullet, "", "b"),
            entry(0, NumberFormat::Bullet, "", "c"),
            entry(0, NumberFormat::Bullet, "", "d"),
        ]);
        let html = list.to_html();
        assert_eq!(html.matches("<ul").count(), 3);
        assert_eq!(html.matches("</ul>").count(), 3);
        assert!(html.contains("c</p></li></ul><ul"));
    }

    #[test]
    fn test_counter_saturates_at_maximum() {
        let mut first = entry(0, NumberFormat::Decimal, "%1.", "a");
        first.index.start = u32::MAX;
        let second = first.clone();
        let list = NumberingList::new(vec![first, second]);
        let max = u32::MAX.to_string();
        assert_eq!(
            markers(&list.to_html()),
            vec![format!("{}.", max), format!("{}.", max)]
        );
    }

    #[test]
    fn test_deep_levels_are_clamped() {
        let mut deep = entry(0, NumberFormat::Bullet, "", "tief");
        deep.index.level = "200000".into();
        assert_eq!(deep.index.level_number(), MAX_LEVEL);
        let html = NumberingList::new(vec![deep.clone()]).to_html();
        assert_eq!(html.matches("<ul").count(), MAX_LEVEL + 1);

        deep.index.level = "99999999999999999999999".into();
        assert_eq!(deep.index.level_number(), 0);
    }

    #[test]
    fn test_legal_numbering_forces_decimal() {
        let mut first = entry(0, NumberFormat::UpperRoman, "%1.", "a");
        first.index.start = 3;
        let mut second = entry(1, NumberFormat::Decimal, "%1.%2", "b");
        second.index.legal = true;
        let list = NumberingList::new(vec![first, second]);
        assert_eq!(markers(&list.to_html()), vec!["III.", "3.1"]);
    }

    #[test]
    fn test_bullet_glyph_follows_font() {
        let mut index = NumberingListEntryIndex::default();
        assert_eq!(index.bullet_glyph(), "\u{2022}");
        index.font_family = Some("Courier New".into());
        assert_eq!(index.bullet_glyph(), "\u{25E6}");
        index.font_family = Some("Wingdings".into());
        assert_eq!(index.bullet_glyph(), "\u{25AA}");
    }

    #[test]
    fn test_letters_cycle_through_umlauts() {
        assert_eq!(NumberFormat::LowerLetter.format(1), "a");
        assert_eq!(NumberFormat::LowerLetter.format(27), "ä");
        assert_eq!(NumberFormat::UpperLetter.format(30), "ẞ");
        assert_eq!(NumberFormat::LowerLetter.format(31), "a");
    }

    #[test]
    fn test_roman_numerals() {
        assert_eq!(NumberFormat::UpperRoman.format(4), "IV");
        assert_eq!(NumberFormat::LowerRoman.format(1994), "mcmxciv");
    }

    #[test]
    fn test_suffix_and_malformed_level() {
        let mut item = entry(0, NumberFormat::Decimal, "%1.", "text");
        item.index.level = "x".into();
        item.index.suffix = NumberingSuffix::Space;
        let html = NumberingList::new(vec![item]).to_html();
        assert_eq!(
            html,
            "<ol style=\"list-style-type: none;\"><li><p><span>1.</span> text</p></li></ol>"
        );
    }
}
