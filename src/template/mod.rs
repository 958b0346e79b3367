//! Typographic style configuration for .docx template generation.
//!
//! [`StyleConfig`] is a pure value object: six named groups of typographic
//! preferences, mutated field-by-field or by applying a named preset, and
//! consumed by [`render::render_to_docx`].

mod presets;
mod render;

pub use presets::{get_preset, TemplatePreset};
pub use render::render_to_docx;

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_EAST_ASIAN_FONT: &str = "SimSun";
pub const DEFAULT_LATIN_FONT: &str = "Times New Roman";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    #[default]
    Justify,
}

/// Font name, point size and face options shared by several style slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSpec {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
        }
    }
}

/// The east-asian/latin/numeral font triple applied to body text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharFonts {
    pub east_asian: String,
    pub latin: String,
    pub numeral: String,
    pub size: u32,
}

impl Default for CharFonts {
    fn default() -> Self {
        Self {
            east_asian: DEFAULT_EAST_ASIAN_FONT.to_string(),
            latin: DEFAULT_LATIN_FONT.to_string(),
            numeral: DEFAULT_LATIN_FONT.to_string(),
            size: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParagraphFormat {
    /// First-line indent in character widths (one character assumed 12pt).
    pub first_line_indent_chars: f64,
    /// Line spacing multiplier (1.0 = single).
    pub line_spacing: f64,
    /// Space before each paragraph, in points.
    pub space_before_pt: f64,
    pub alignment: Alignment,
}

impl Default for ParagraphFormat {
    fn default() -> Self {
        Self {
            first_line_indent_chars: 2.0,
            line_spacing: 1.5,
            space_before_pt: 6.0,
            alignment: Alignment::Justify,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicText {
    pub paragraph: FontSpec,
    pub body: FontSpec,
    pub char_fonts: CharFonts,
    pub format: ParagraphFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub alignment: Alignment,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
            underline: false,
            alignment: Alignment::Left,
        }
    }
}

/// One style record per heading level 1-9.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Headings {
    pub levels: [HeadingStyle; 9],
}

impl Headings {
    /// `level` is 1-based and must be within 1..=9.
    ///
    /// # Panics
    ///
    /// Panics when `level` is outside that range.
    pub fn level(&self, level: usize) -> &HeadingStyle {
        assert!(
            (1..=9).contains(&level),
            "heading level {level} is outside 1-9"
        );
        &self.levels[level - 1]
    }

    /// See [`Headings::level`] for the accepted range.
    pub fn level_mut(&mut self, level: usize) -> &mut HeadingStyle {
        assert!(
            (1..=9).contains(&level),
            "heading level {level} is outside 1-9"
        );
        &mut self.levels[level - 1]
    }
}

impl Default for Headings {
    fn default() -> Self {
        let mut levels: [HeadingStyle; 9] = Default::default();
        for (index, style) in levels.iter_mut().enumerate() {
            let level = index + 1;
            style.size = match level {
                1 => 16,
                2 => 14,
                3 => 13,
                _ => 12,
            };
            style.bold = level <= 3;
            style.alignment = if level == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            };
        }
        Self { levels }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingStyle {
    #[default]
    Decimal,
    LowerAlpha,
    UpperAlpha,
    UpperRoman,
}

impl NumberingStyle {
    /// Marker text for the 1-based item `index` in the sample content.
    pub fn marker(self, index: usize) -> String {
        match self {
            NumberingStyle::Decimal => format!("{index}."),
            NumberingStyle::LowerAlpha => {
                format!("{}.", (b'a' + ((index - 1) % 26) as u8) as char)
            }
            NumberingStyle::UpperAlpha => {
                format!("{}.", (b'A' + ((index - 1) % 26) as u8) as char)
            }
            NumberingStyle::UpperRoman => {
                const ROMAN: &[&str] = &["I", "II", "III", "IV", "V", "VI", "VII", "VIII", "IX"];
                format!("{}.", ROMAN[(index - 1) % ROMAN.len()])
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletStyle {
    #[default]
    Disc,
    Square,
    Circle,
    Arrow,
}

impl BulletStyle {
    pub fn glyph(self) -> char {
        match self {
            BulletStyle::Disc => '●',
            BulletStyle::Square => '■',
            BulletStyle::Circle => '○',
            BulletStyle::Arrow => '►',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderedListStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub numbering: NumberingStyle,
}

impl Default for OrderedListStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
            numbering: NumberingStyle::Decimal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnorderedListStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub bullet: BulletStyle,
}

impl Default for UnorderedListStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
            bullet: BulletStyle::Disc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Lists {
    pub ordered: OrderedListStyle,
    pub unordered: UnorderedListStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperlinkStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: String,
}

impl Default for HyperlinkStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
            underline: true,
            color: "#0000FF".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for FootnoteStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 9,
            bold: false,
            italic: true,
            underline: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootnoteReferenceStyle {
    pub size: u32,
    pub superscript: bool,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FootnoteReferenceStyle {
    fn default() -> Self {
        Self {
            size: 9,
            superscript: true,
            bold: false,
            italic: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct References {
    pub hyperlink: HyperlinkStyle,
    pub footnote: FootnoteStyle,
    pub footnote_reference: FootnoteReferenceStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockQuoteStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    /// Left and right indent in character widths.
    pub indent_chars: f64,
}

impl Default for BlockQuoteStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: false,
            italic: false,
            indent_chars: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HorizontalRuleStyle {
    pub thickness_pt: f64,
    pub width_percent: u32,
    pub color: String,
}

impl Default for HorizontalRuleStyle {
    fn default() -> Self {
        Self {
            thickness_pt: 1.0,
            width_percent: 100,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptionPosition {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    pub font: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub position: CaptionPosition,
}

impl CaptionStyle {
    fn table_default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 12,
            bold: true,
            italic: false,
            position: CaptionPosition::Above,
        }
    }

    fn figure_default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 10,
            bold: false,
            italic: true,
            position: CaptionPosition::Below,
        }
    }
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self::table_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStyle {
    pub font: String,
    pub size: u32,
    pub header_bold: bool,
    pub border_visible: bool,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 10,
            header_bold: true,
            border_visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutElements {
    pub block_quote: BlockQuoteStyle,
    pub horizontal_rule: HorizontalRuleStyle,
    pub table_caption: CaptionStyle,
    pub table: TableStyle,
    pub figure_caption: CaptionStyle,
}

impl Default for LayoutElements {
    fn default() -> Self {
        Self {
            block_quote: BlockQuoteStyle::default(),
            horizontal_rule: HorizontalRuleStyle::default(),
            table_caption: CaptionStyle::table_default(),
            table: TableStyle::default(),
            figure_caption: CaptionStyle::figure_default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    B4,
    B5,
    Letter,
    Legal,
}

impl PaperSize {
    /// Physical page dimensions in inches, portrait.
    pub fn dimensions_in(self) -> (f64, f64) {
        match self {
            PaperSize::A4 => (8.27, 11.69),
            PaperSize::A3 => (11.69, 16.54),
            PaperSize::A5 => (5.83, 8.27),
            PaperSize::B4 => (9.84, 13.90),
            PaperSize::B5 => (6.93, 9.84),
            PaperSize::Letter => (8.5, 11.0),
            PaperSize::Legal => (8.5, 14.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top_cm: f64,
    pub bottom_cm: f64,
    pub left_cm: f64,
    pub right_cm: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top_cm: 2.54,
            bottom_cm: 2.54,
            left_cm: 3.17,
            right_cm: 3.17,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderFooter {
    pub font: String,
    pub size: u32,
    pub text: String,
}

impl Default for HeaderFooter {
    fn default() -> Self {
        Self {
            font: DEFAULT_EAST_ASIAN_FONT.to_string(),
            size: 9,
            text: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: Margins,
    pub header: HeaderFooter,
    pub footer: HeaderFooter,
}

/// The full typographic preference record.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub basic_text: BasicText,
    pub headings: Headings,
    pub lists: Lists,
    pub references: References,
    pub layout_elements: LayoutElements,
    pub page_settings: PageSettings,
}

impl StyleConfig {
    /// Parse a config from JSON and validate its ranges.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StyleConfig = serde_json::from_str(json)
            .map_err(|e| AppError::InvalidStyle(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::InvalidStyle(format!("config not serializable: {e}")))
    }

    /// Range checks applied before any config is rendered or accepted
    /// from JSON.
    pub fn validate(&self) -> Result<()> {
        check_font_size("paragraph", self.basic_text.paragraph.size)?;
        check_font_size("body", self.basic_text.body.size)?;
        check_font_size("character", self.basic_text.char_fonts.size)?;
        check_range(
            "first-line indent",
            self.basic_text.format.first_line_indent_chars,
            0.0,
            10.0,
            "characters",
        )?;
        check_range(
            "line spacing",
            self.basic_text.format.line_spacing,
            1.0,
            3.0,
            "",
        )?;
        check_range(
            "paragraph spacing",
            self.basic_text.format.space_before_pt,
            0.0,
            48.0,
            "pt",
        )?;

        for (index, heading) in self.headings.levels.iter().enumerate() {
            check_font_size(&format!("heading {}", index + 1), heading.size)?;
        }

        check_font_size("ordered list", self.lists.ordered.size)?;
        check_font_size("unordered list", self.lists.unordered.size)?;
        check_font_size("hyperlink", self.references.hyperlink.size)?;
        check_font_size("footnote", self.references.footnote.size)?;
        check_font_size("footnote reference", self.references.footnote_reference.size)?;
        check_font_size("block quote", self.layout_elements.block_quote.size)?;
        check_font_size("table caption", self.layout_elements.table_caption.size)?;
        check_font_size("table", self.layout_elements.table.size)?;
        check_font_size("figure caption", self.layout_elements.figure_caption.size)?;
        check_font_size("header", self.page_settings.header.size)?;
        check_font_size("footer", self.page_settings.footer.size)?;

        check_range(
            "block quote indent",
            self.layout_elements.block_quote.indent_chars,
            0.0,
            10.0,
            "characters",
        )?;
        check_range(
            "rule thickness",
            self.layout_elements.horizontal_rule.thickness_pt,
            0.5,
            5.0,
            "pt",
        )?;
        check_range(
            "rule width",
            f64::from(self.layout_elements.horizontal_rule.width_percent),
            10.0,
            100.0,
            "%",
        )?;

        let margins = &self.page_settings.margins;
        for (label, value) in [
            ("top margin", margins.top_cm),
            ("bottom margin", margins.bottom_cm),
            ("left margin", margins.left_cm),
            ("right margin", margins.right_cm),
        ] {
            check_range(label, value, 0.0, 10.0, "cm")?;
        }

        Ok(())
    }
}

fn check_font_size(label: &str, size: u32) -> Result<()> {
    if !(6..=72).contains(&size) {
        return Err(AppError::InvalidStyle(format!(
            "{label} font size {size}pt is outside 6-72pt"
        )));
    }
    Ok(())
}

fn check_range(label: &str, value: f64, min: f64, max: f64, unit: &str) -> Result<()> {
    if !(min..=max).contains(&value) || !value.is_finite() {
        return Err(AppError::InvalidStyle(format!(
            "{label} {value}{unit} is outside {min}{unit}-{max}{unit}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = StyleConfig::default();
        assert_eq!(config.basic_text.body.size, 12);
        assert_eq!(config.basic_text.format.first_line_indent_chars, 2.0);
        assert_eq!(config.basic_text.format.line_spacing, 1.5);
        assert_eq!(config.basic_text.format.alignment, Alignment::Justify);

        assert_eq!(config.headings.level(1).size, 16);
        assert!(config.headings.level(1).bold);
        assert_eq!(config.headings.level(1).alignment, Alignment::Center);
        assert_eq!(config.headings.level(4).size, 12);
        assert!(!config.headings.level(4).bold);

        assert_eq!(config.references.footnote.size, 9);
        assert!(config.references.footnote.italic);
        assert!(config.references.footnote_reference.superscript);

        assert_eq!(config.page_settings.margins.top_cm, 2.54);
        assert_eq!(config.page_settings.margins.left_cm, 3.17);
        assert_eq!(config.page_settings.paper_size, PaperSize::A4);
    }

    #[test]
    fn default_config_validates() {
        StyleConfig::default().validate().unwrap();
    }

    #[test]
    fn out_of_range_font_size_is_rejected() {
        let mut config = StyleConfig::default();
        config.headings.level_mut(2).size = 100;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("heading 2"));
    }

    #[test]
    fn out_of_range_margin_is_rejected() {
        let mut config = StyleConfig::default();
        config.page_settings.margins.left_cm = 11.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_preserves_all_fields() {
        let mut config = StyleConfig::default();
        config.page_settings.orientation = Orientation::Landscape;
        config.lists.ordered.numbering = NumberingStyle::UpperRoman;
        config.layout_elements.table.border_visible = false;

        let json = config.to_json().unwrap();
        let restored = StyleConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn from_json_validates_ranges() {
        let mut config = StyleConfig::default();
        config.basic_text.body.size = 2;
        let json = serde_json::to_string(&config).unwrap();
        assert!(StyleConfig::from_json(&json).is_err());
    }

    #[test]
    #[should_panic(expected = "heading level 0 is outside 1-9")]
    fn heading_level_zero_is_rejected() {
        let headings = Headings::default();
        headings.level(0);
    }

    #[test]
    #[should_panic(expected = "heading level 10 is outside 1-9")]
    fn heading_level_ten_is_rejected() {
        let mut headings = Headings::default();
        headings.level_mut(10);
    }

    #[test]
    fn numbering_markers() {
        assert_eq!(NumberingStyle::Decimal.marker(3), "3.");
        assert_eq!(NumberingStyle::LowerAlpha.marker(2), "b.");
        assert_eq!(NumberingStyle::UpperAlpha.marker(1), "A.");
        assert_eq!(NumberingStyle::UpperRoman.marker(4), "IV.");
    }
}
