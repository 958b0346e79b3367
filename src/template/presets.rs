//! Built-in template presets. Each preset is a factory producing one
//! canonical [`StyleConfig`]; applying one overwrites a subset of the
//! default fields.

use super::{Alignment, StyleConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplatePreset {
    Academic,
    Report,
    Novel,
    Resume,
    Letter,
    #[default]
    Default,
}

/// Look up a preset by name and return its canonical config. Unrecognized
/// names yield the default preset; this never fails.
pub fn get_preset(name: &str) -> StyleConfig {
    TemplatePreset::from_name(name).config()
}

impl TemplatePreset {
    pub const ALL: [TemplatePreset; 6] = [
        TemplatePreset::Academic,
        TemplatePreset::Report,
        TemplatePreset::Novel,
        TemplatePreset::Resume,
        TemplatePreset::Letter,
        TemplatePreset::Default,
    ];

    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "academic" => TemplatePreset::Academic,
            "report" => TemplatePreset::Report,
            "novel" => TemplatePreset::Novel,
            "resume" => TemplatePreset::Resume,
            "letter" => TemplatePreset::Letter,
            _ => TemplatePreset::Default,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TemplatePreset::Academic => "academic",
            TemplatePreset::Report => "report",
            TemplatePreset::Novel => "novel",
            TemplatePreset::Resume => "resume",
            TemplatePreset::Letter => "letter",
            TemplatePreset::Default => "default",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            TemplatePreset::Academic => {
                "Formal paper layout: centered 16pt level-1 headings, justified body, 9pt italic footnotes"
            }
            TemplatePreset::Report => {
                "Business report: Arial latin text, large centered chapter headings, 11pt tables"
            }
            TemplatePreset::Novel => "Manuscript layout with 20pt centered chapter titles",
            TemplatePreset::Resume => {
                "Compact left-aligned layout, no first-line indent, 1.15 line spacing"
            }
            TemplatePreset::Letter => "Correspondence layout, left-aligned body and headings",
            TemplatePreset::Default => "General-purpose defaults",
        }
    }

    pub fn config(self) -> StyleConfig {
        let mut config = StyleConfig::default();
        match self {
            TemplatePreset::Default => {}
            TemplatePreset::Academic => {
                config.basic_text.format.first_line_indent_chars = 2.0;
                config.basic_text.format.line_spacing = 1.5;
                config.basic_text.format.space_before_pt = 6.0;
                config.basic_text.format.alignment = Alignment::Justify;
                set_heading(&mut config, 1, 16, true, Alignment::Center);
                set_heading(&mut config, 2, 14, true, Alignment::Left);
                set_heading(&mut config, 3, 13, true, Alignment::Left);
                for level in 4..=9 {
                    set_heading(&mut config, level, 12, false, Alignment::Left);
                }
                config.references.footnote.size = 9;
                config.references.footnote.italic = true;
                config.references.footnote_reference.superscript = true;
            }
            TemplatePreset::Report => {
                config.basic_text.char_fonts.latin = "Arial".to_string();
                config.basic_text.char_fonts.numeral = "Arial".to_string();
                set_heading(&mut config, 1, 18, true, Alignment::Center);
                set_heading(&mut config, 2, 16, true, Alignment::Center);
                set_heading(&mut config, 3, 14, true, Alignment::Left);
                config.layout_elements.table_caption.bold = true;
                config.layout_elements.table.size = 11;
            }
            TemplatePreset::Novel => {
                set_heading(&mut config, 1, 20, true, Alignment::Center);
                set_heading(&mut config, 2, 16, true, Alignment::Center);
                set_heading(&mut config, 3, 14, true, Alignment::Left);
            }
            TemplatePreset::Resume => {
                config.basic_text.char_fonts.latin = "Arial".to_string();
                config.basic_text.char_fonts.numeral = "Arial".to_string();
                config.basic_text.format.first_line_indent_chars = 0.0;
                config.basic_text.format.line_spacing = 1.15;
                config.basic_text.format.space_before_pt = 3.0;
                config.basic_text.format.alignment = Alignment::Left;
                set_heading(&mut config, 1, 18, true, Alignment::Center);
                set_heading(&mut config, 2, 14, true, Alignment::Left);
            }
            TemplatePreset::Letter => {
                config.basic_text.format.first_line_indent_chars = 2.0;
                config.basic_text.format.line_spacing = 1.5;
                config.basic_text.format.space_before_pt = 6.0;
                config.basic_text.format.alignment = Alignment::Left;
                set_heading(&mut config, 1, 16, true, Alignment::Left);
                set_heading(&mut config, 2, 14, true, Alignment::Left);
            }
        }
        config
    }
}

fn set_heading(config: &mut StyleConfig, level: usize, size: u32, bold: bool, alignment: Alignment) {
    let heading = config.headings.level_mut(level);
    heading.size = size;
    heading.bold = bold;
    heading.alignment = alignment;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup_is_idempotent() {
        assert_eq!(get_preset("academic"), get_preset("academic"));
        assert_eq!(get_preset("report"), get_preset("report"));
    }

    #[test]
    fn unknown_name_returns_default() {
        assert_eq!(get_preset("not-a-real-name"), get_preset("default"));
        assert_eq!(get_preset(""), StyleConfig::default());
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(get_preset("Academic"), get_preset("academic"));
    }

    #[test]
    fn report_preset_overrides() {
        let config = get_preset("report");
        assert_eq!(config.basic_text.char_fonts.latin, "Arial");
        assert_eq!(config.headings.level(1).size, 18);
        assert_eq!(config.headings.level(2).alignment, Alignment::Center);
        assert_eq!(config.layout_elements.table.size, 11);
    }

    #[test]
    fn resume_preset_drops_indent_and_tightens_spacing() {
        let config = get_preset("resume");
        assert_eq!(config.basic_text.format.first_line_indent_chars, 0.0);
        assert_eq!(config.basic_text.format.line_spacing, 1.15);
        assert_eq!(config.basic_text.format.alignment, Alignment::Left);
    }

    #[test]
    fn all_presets_validate() {
        for preset in TemplatePreset::ALL {
            preset.config().validate().unwrap();
        }
    }
}
