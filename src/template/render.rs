//! Renders a [`StyleConfig`] into a .docx template artifact.
//!
//! The produced document carries the configured style definitions on the
//! `Normal` and `Heading1`-`Heading9` slots (plus hyperlink, footnote, list,
//! quote and caption slots) and a fixed illustrative content skeleton. The
//! skeleton never varies with the config beyond list markers and caption
//! placement; the artifact exists to show what the settings look like, not
//! to hold real content.

use docx_rs::*;
use std::io::Cursor;

use crate::error::{AppError, Result};

use super::{
    Alignment, CaptionPosition, CaptionStyle, FootnoteReferenceStyle, HeaderFooter,
    HorizontalRuleStyle, Orientation, PageSettings, PaperSize, StyleConfig, TableStyle,
};

const TWIPS_PER_INCH: f64 = 1440.0;
const TWIPS_PER_POINT: f64 = 20.0;
/// One character of first-line indent is assumed to be 12pt wide.
const POINTS_PER_CHAR: f64 = 12.0;
/// Line spacing is expressed in 240ths of a line.
const LINE_UNITS_PER_SINGLE: f64 = 240.0;

pub(crate) fn cm_to_inches(cm: f64) -> f64 {
    cm / 2.54
}

fn inches_to_twips(inches: f64) -> u32 {
    (inches * TWIPS_PER_INCH).round() as u32
}

fn cm_to_twips(cm: f64) -> i32 {
    (cm_to_inches(cm) * TWIPS_PER_INCH).round() as i32
}

fn chars_to_twips(chars: f64) -> i32 {
    (chars * POINTS_PER_CHAR * TWIPS_PER_POINT).round() as i32
}

fn pt_to_half_points(pt: u32) -> usize {
    (pt * 2) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageGeometry {
    pub width_twips: u32,
    pub height_twips: u32,
}

/// Resolve the paper size to physical dimensions, swapping width and height
/// for landscape orientation.
pub(crate) fn page_geometry(size: PaperSize, orientation: Orientation) -> PageGeometry {
    let (width_in, height_in) = size.dimensions_in();
    let (width_in, height_in) = match orientation {
        Orientation::Portrait => (width_in, height_in),
        Orientation::Landscape => (height_in, width_in),
    };
    PageGeometry {
        width_twips: inches_to_twips(width_in),
        height_twips: inches_to_twips(height_in),
    }
}

impl Alignment {
    fn to_docx(self) -> AlignmentType {
        match self {
            Alignment::Left => AlignmentType::Left,
            Alignment::Center => AlignmentType::Center,
            Alignment::Right => AlignmentType::Right,
            Alignment::Justify => AlignmentType::Justified,
        }
    }
}

/// Render the config into the bytes of a .docx file. Pure with respect to
/// the config; validation failures and packing failures are the only error
/// paths.
pub fn render_to_docx(config: &StyleConfig) -> Result<Vec<u8>> {
    config.validate()?;

    let mut docx = Docx::new();
    docx = apply_page_settings(docx, &config.page_settings);
    docx = apply_styles(docx, config);
    docx = add_sample_content(docx, config);

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| AppError::Template(format!("failed to pack docx: {e}")))?;
    Ok(cursor.into_inner())
}

fn apply_page_settings(mut docx: Docx, page: &PageSettings) -> Docx {
    let geometry = page_geometry(page.paper_size, page.orientation);
    docx = docx.page_size(geometry.width_twips, geometry.height_twips);

    // Margins are stored in centimeters; cm / 2.54 is the applied inch value.
    docx = docx.page_margin(
        PageMargin::new()
            .top(cm_to_twips(page.margins.top_cm))
            .bottom(cm_to_twips(page.margins.bottom_cm))
            .left(cm_to_twips(page.margins.left_cm))
            .right(cm_to_twips(page.margins.right_cm)),
    );

    if !page.header.text.is_empty() {
        docx = docx.header(Header::new().add_paragraph(band_paragraph(&page.header)));
    }
    if !page.footer.text.is_empty() {
        docx = docx.footer(Footer::new().add_paragraph(band_paragraph(&page.footer)));
    }

    docx
}

fn band_paragraph(band: &HeaderFooter) -> Paragraph {
    Paragraph::new().align(AlignmentType::Center).add_run(
        Run::new()
            .add_text(band.text.as_str())
            .size(pt_to_half_points(band.size))
            .fonts(single_font(&band.font)),
    )
}

fn single_font(name: &str) -> RunFonts {
    RunFonts::new()
        .ascii(name)
        .hi_ansi(name)
        .east_asia(name)
        .cs(name)
}

fn hex(color: &str) -> &str {
    color.trim_start_matches('#')
}

fn apply_styles(mut docx: Docx, config: &StyleConfig) -> Docx {
    let body = &config.basic_text.body;
    let chars = &config.basic_text.char_fonts;
    let format = &config.basic_text.format;

    let normal_fonts = RunFonts::new()
        .ascii(chars.latin.as_str())
        .hi_ansi(chars.latin.as_str())
        .east_asia(chars.east_asian.as_str())
        .cs(chars.numeral.as_str());

    let mut normal = Style::new("Normal", StyleType::Paragraph)
        .name("Normal")
        .fonts(normal_fonts)
        .size(pt_to_half_points(body.size))
        .align(format.alignment.to_docx())
        .indent(
            None,
            Some(SpecialIndentType::FirstLine(chars_to_twips(
                format.first_line_indent_chars,
            ))),
            None,
            None,
        )
        .line_spacing(
            LineSpacing::new()
                .line_rule(LineSpacingType::Auto)
                .line((format.line_spacing * LINE_UNITS_PER_SINGLE).round() as i32)
                .before((format.space_before_pt * TWIPS_PER_POINT).round() as u32),
        );
    if body.bold {
        normal = normal.bold();
    }
    if body.italic {
        normal = normal.italic();
    }
    docx = docx.add_style(normal);

    // Heading slots are always (re)created, so a level that the underlying
    // document model lacks gets defined rather than failing.
    for level in 1..=9 {
        let heading = config.headings.level(level);
        let mut style = Style::new(format!("Heading{level}"), StyleType::Paragraph)
            .name(format!("Heading {level}"))
            .fonts(single_font(&heading.font))
            .size(pt_to_half_points(heading.size))
            .align(heading.alignment.to_docx());
        if heading.bold {
            style = style.bold();
        }
        if heading.italic {
            style = style.italic();
        }
        if heading.underline {
            style = style.underline("single");
        }
        docx = docx.add_style(style);
    }

    let link = &config.references.hyperlink;
    let mut hyperlink = Style::new("Hyperlink", StyleType::Character)
        .name("Hyperlink")
        .fonts(single_font(&link.font))
        .size(pt_to_half_points(link.size))
        .color(hex(&link.color));
    if link.underline {
        hyperlink = hyperlink.underline("single");
    }
    if link.bold {
        hyperlink = hyperlink.bold();
    }
    if link.italic {
        hyperlink = hyperlink.italic();
    }
    docx = docx.add_style(hyperlink);

    let footnote = &config.references.footnote;
    let mut footnote_text = Style::new("FootnoteText", StyleType::Paragraph)
        .name("Footnote Text")
        .fonts(single_font(&footnote.font))
        .size(pt_to_half_points(footnote.size));
    if footnote.bold {
        footnote_text = footnote_text.bold();
    }
    if footnote.italic {
        footnote_text = footnote_text.italic();
    }
    if footnote.underline {
        footnote_text = footnote_text.underline("single");
    }
    docx = docx.add_style(footnote_text);

    // Superscript is applied on the reference run itself; the style slot
    // carries the size and face options.
    let footnote_ref = &config.references.footnote_reference;
    let mut reference = Style::new("FootnoteReference", StyleType::Character)
        .name("Footnote Reference")
        .size(pt_to_half_points(footnote_ref.size));
    if footnote_ref.bold {
        reference = reference.bold();
    }
    if footnote_ref.italic {
        reference = reference.italic();
    }
    docx = docx.add_style(reference);

    let quote = &config.layout_elements.block_quote;
    let quote_indent = chars_to_twips(quote.indent_chars);
    let mut blockquote = Style::new("Blockquote", StyleType::Paragraph)
        .name("Block Quote")
        .fonts(single_font(&quote.font))
        .size(pt_to_half_points(quote.size))
        .indent(Some(quote_indent), None, Some(quote_indent), None);
    if quote.bold {
        blockquote = blockquote.bold();
    }
    if quote.italic {
        blockquote = blockquote.italic();
    }
    docx = docx.add_style(blockquote);

    docx = docx.add_style(caption_style("Caption", &config.layout_elements.table_caption));
    docx = docx.add_style(caption_style(
        "FigureCaption",
        &config.layout_elements.figure_caption,
    ));

    let ordered = &config.lists.ordered;
    let mut list_number = Style::new("ListNumber", StyleType::Paragraph)
        .name("List Number")
        .fonts(single_font(&ordered.font))
        .size(pt_to_half_points(ordered.size));
    if ordered.bold {
        list_number = list_number.bold();
    }
    if ordered.italic {
        list_number = list_number.italic();
    }
    docx = docx.add_style(list_number);

    let unordered = &config.lists.unordered;
    let mut list_bullet = Style::new("ListBullet", StyleType::Paragraph)
        .name("List Bullet")
        .fonts(single_font(&unordered.font))
        .size(pt_to_half_points(unordered.size));
    if unordered.bold {
        list_bullet = list_bullet.bold();
    }
    if unordered.italic {
        list_bullet = list_bullet.italic();
    }
    docx = docx.add_style(list_bullet);

    docx
}

fn caption_style(id: &str, caption: &CaptionStyle) -> Style {
    let mut style = Style::new(id, StyleType::Paragraph)
        .name(id)
        .fonts(single_font(&caption.font))
        .size(pt_to_half_points(caption.size))
        .align(AlignmentType::Center);
    if caption.bold {
        style = style.bold();
    }
    if caption.italic {
        style = style.italic();
    }
    style
}

fn heading(text: &str, level: usize) -> Paragraph {
    Paragraph::new()
        .style(&format!("Heading{level}"))
        .add_run(Run::new().add_text(text))
}

fn body_text(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn centered(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Center)
        .add_run(Run::new().add_text(text))
}

/// Word has no first-class horizontal-rule element; a run of spaced
/// underscores stands in, sized by the configured width percentage.
fn rule_paragraph(rule: &HorizontalRuleStyle) -> Paragraph {
    let segments = ((rule.width_percent as usize) * 39 / 100).max(4);
    let text = vec!["_"; segments].join(" ");
    let mut run = Run::new().add_text(text).color(hex(&rule.color));
    if rule.thickness_pt >= 2.0 {
        run = run.bold();
    }
    Paragraph::new().align(AlignmentType::Center).add_run(run)
}

/// Sample footnote-reference marker carrying the configured size and face
/// options. `Run` exposes no `vert_align` builder; superscript goes through
/// the run property directly.
fn footnote_reference_run(reference: &FootnoteReferenceStyle) -> Run {
    let mut run = Run::new()
        .add_text("1")
        .size(pt_to_half_points(reference.size));
    if reference.superscript {
        run.run_property = run.run_property.vert_align(VertAlignType::SuperScript);
    }
    if reference.bold {
        run = run.bold();
    }
    if reference.italic {
        run = run.italic();
    }
    run
}

fn sample_table(table: &TableStyle) -> Table {
    let header = ["Metric", "Treatment", "Control", "Change"];
    let rows = [
        ["Mean", "85.6", "72.3", "+18.4%"],
        ["Std. dev.", "5.2", "6.8", "-23.5%"],
        ["Samples", "120", "115", "+4.3%"],
    ];

    let mut table_rows = vec![TableRow::new(
        header
            .iter()
            .map(|text| table_cell(text, table, table.header_bold))
            .collect(),
    )];
    for row in rows {
        table_rows.push(TableRow::new(
            row.iter().map(|text| table_cell(text, table, false)).collect(),
        ));
    }

    let mut built = Table::new(table_rows).set_grid(vec![2400, 2400, 2400, 2400]);
    if !table.border_visible {
        built = built.clear_all_border();
    }
    built
}

fn table_cell(text: &str, table: &TableStyle, bold: bool) -> TableCell {
    let mut run = Run::new()
        .add_text(text)
        .size(pt_to_half_points(table.size))
        .fonts(single_font(&table.font));
    if bold {
        run = run.bold();
    }
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}

fn add_sample_content(mut docx: Docx, config: &StyleConfig) -> Docx {
    docx = docx
        .add_paragraph(heading("Document Title", 1))
        .add_paragraph(heading("Subtitle", 2))
        .add_paragraph(centered("Author: Your Name"))
        .add_paragraph(centered("Date: 2023-12-31"))
        .add_paragraph(Paragraph::new());

    docx = docx
        .add_paragraph(heading("Abstract", 2))
        .add_paragraph(body_text(
            "This sample abstract demonstrates the body style: font, size, \
             line spacing, first-line indent and alignment. The rest of the \
             document walks through every configured element so the exported \
             template can be inspected at a glance.",
        ))
        .add_paragraph(heading("Keywords", 3))
        .add_paragraph(body_text("keyword one, keyword two, keyword three"));

    docx = docx
        .add_paragraph(heading("1. Introduction", 1))
        .add_paragraph(body_text(
            "Introductory body text under a level-1 heading. Paragraphs pick \
             up the configured base formatting automatically.",
        ))
        .add_paragraph(heading("1.1 Background", 2))
        .add_paragraph(body_text("Body text under a level-2 heading."))
        .add_paragraph(heading("1.1.1 Related Work", 3))
        .add_paragraph(body_text("Body text under a level-3 heading."))
        .add_paragraph(heading("1.1.1.1 Specific Topics", 4))
        .add_paragraph(body_text("Body text under a level-4 heading."))
        .add_paragraph(heading("1.1.1.1.1 Details", 5))
        .add_paragraph(body_text("Body text under a level-5 heading."))
        .add_paragraph(heading("1.2 Purpose", 2))
        .add_paragraph(body_text("Further level-2 body text."));

    docx = docx
        .add_paragraph(heading("2. Method", 1))
        .add_paragraph(body_text("Body text introducing the sample lists."))
        .add_paragraph(heading("2.1 Procedure", 2));

    let steps = [
        "Prepare the materials",
        "Set up the environment",
        "Run the experiment",
        "Collect and analyze the data",
        "Draw conclusions",
    ];
    for (index, step) in steps.iter().enumerate() {
        let marker = config.lists.ordered.numbering.marker(index + 1);
        docx = docx.add_paragraph(
            Paragraph::new()
                .style("ListNumber")
                .add_run(Run::new().add_text(format!("{marker} {step}"))),
        );
    }

    docx = docx.add_paragraph(heading("2.2 Notes", 2));
    let bullet = config.lists.unordered.bullet.glyph();
    let notes = [
        "Safety first",
        "Record data accurately",
        "Keep the workspace tidy",
        "Follow the procedure",
    ];
    for note in notes {
        docx = docx.add_paragraph(
            Paragraph::new()
                .style("ListBullet")
                .add_run(Run::new().add_text(format!("{bullet} {note}"))),
        );
    }

    docx = docx
        .add_paragraph(heading("3. Results and Discussion", 1))
        .add_paragraph(body_text("Body text preceding a block quotation."))
        .add_paragraph(
            Paragraph::new().style("Blockquote").add_run(Run::new().add_text(
                "A block quotation, indented on both sides per the configured \
                 character count.",
            )),
        )
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("Plain text, "))
                .add_run(Run::new().add_text("bold text, ").bold())
                .add_run(Run::new().add_text("italic text, ").italic())
                .add_run(Run::new().add_text("underlined text.").underline("single")),
        );

    docx = docx.add_paragraph(heading("3.1 Data Analysis", 2));

    let table_caption = Paragraph::new()
        .style("Caption")
        .add_run(Run::new().add_text("Table 1: Sample statistics"));
    match config.layout_elements.table_caption.position {
        CaptionPosition::Above => {
            docx = docx
                .add_paragraph(table_caption)
                .add_table(sample_table(&config.layout_elements.table));
        }
        CaptionPosition::Below => {
            docx = docx
                .add_table(sample_table(&config.layout_elements.table))
                .add_paragraph(table_caption);
        }
    }

    docx = docx.add_paragraph(
        Paragraph::new()
            .style("FigureCaption")
            .add_run(Run::new().add_text("Figure 1: Sample comparison chart")),
    );

    docx = docx
        .add_paragraph(heading("3.2 Discussion", 2))
        .add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(
                    "Discussion text citing reference [1]; see footnote 1 for details.",
                ))
                .add_run(footnote_reference_run(
                    &config.references.footnote_reference,
                )),
        )
        .add_paragraph(
            Paragraph::new().style("FootnoteText").add_run(Run::new().add_text(
                "1. Footnote content, styled by the footnote slot.",
            )),
        );

    let link = &config.references.hyperlink;
    let mut link_run = Run::new()
        .add_text("example link")
        .fonts(single_font(&link.font))
        .size(pt_to_half_points(link.size))
        .color(hex(&link.color));
    if link.underline {
        link_run = link_run.underline("single");
    }
    docx = docx.add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text("For more information visit: "))
            .add_run(link_run),
    );

    docx = docx
        .add_paragraph(rule_paragraph(&config.layout_elements.horizontal_rule))
        .add_paragraph(heading("4. Conclusion", 1))
        .add_paragraph(body_text("Concluding body text."))
        .add_paragraph(heading("4.1 Contributions", 2))
        .add_paragraph(body_text("Summary of contributions."))
        .add_paragraph(heading("4.2 Limitations", 2))
        .add_paragraph(body_text("Known limitations."))
        .add_paragraph(heading("4.3 Future Work", 2))
        .add_paragraph(body_text("Directions for future work."))
        .add_paragraph(rule_paragraph(&config.layout_elements.horizontal_rule));

    docx = docx.add_paragraph(heading("References", 1));
    let references = [
        "[1] Author. Article title. Journal, year, volume(issue): pages.",
        "[2] Author. Book title. Publisher, year.",
        "[3] Author. Paper title. Conference, year: pages.",
        "[4] Author. Report title. Institution, year.",
        "[5] Author. Page title. Site, published date. [accessed date].",
    ];
    for entry in references {
        docx = docx.add_paragraph(body_text(entry));
    }

    docx = docx
        .add_paragraph(heading("Appendix", 1))
        .add_paragraph(body_text("Supplementary material."))
        .add_paragraph(heading("Appendix A: Raw Data", 2))
        .add_paragraph(body_text("Description of the raw data tables."))
        .add_paragraph(heading("Appendix B: Code Samples", 2))
        .add_paragraph(body_text("Description of the code samples."));

    docx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::get_preset;

    #[test]
    fn a4_portrait_geometry() {
        let geometry = page_geometry(PaperSize::A4, Orientation::Portrait);
        assert_eq!(geometry.width_twips, inches_to_twips(8.27));
        assert_eq!(geometry.height_twips, inches_to_twips(11.69));
    }

    #[test]
    fn landscape_swaps_width_and_height() {
        let portrait = page_geometry(PaperSize::A4, Orientation::Portrait);
        let landscape = page_geometry(PaperSize::A4, Orientation::Landscape);
        assert_eq!(landscape.width_twips, portrait.height_twips);
        assert_eq!(landscape.height_twips, portrait.width_twips);
    }

    #[test]
    fn paper_size_table() {
        assert_eq!(PaperSize::A4.dimensions_in(), (8.27, 11.69));
        assert_eq!(PaperSize::A3.dimensions_in(), (11.69, 16.54));
        assert_eq!(PaperSize::A5.dimensions_in(), (5.83, 8.27));
        assert_eq!(PaperSize::Letter.dimensions_in(), (8.5, 11.0));
        assert_eq!(PaperSize::Legal.dimensions_in(), (8.5, 14.0));
    }

    #[test]
    fn margin_of_2_54_cm_is_exactly_one_inch() {
        assert_eq!(cm_to_inches(2.54), 1.0);
        assert_eq!(cm_to_twips(2.54), 1440);
    }

    #[test]
    fn indent_assumes_12pt_character_width() {
        // 2 chars * 12pt * 20 twips/pt
        assert_eq!(chars_to_twips(2.0), 480);
    }

    #[test]
    fn footnote_reference_run_reflects_settings() {
        let run = footnote_reference_run(&FootnoteReferenceStyle::default());
        assert!(run.run_property.vert_align.is_some());
        assert!(run.run_property.sz.is_some());

        let plain = FootnoteReferenceStyle {
            superscript: false,
            ..Default::default()
        };
        let run = footnote_reference_run(&plain);
        assert!(run.run_property.vert_align.is_none());
    }

    #[test]
    fn render_produces_a_zip_archive() {
        let bytes = render_to_docx(&StyleConfig::default()).unwrap();
        assert!(bytes.len() > 1000);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn render_rejects_invalid_config() {
        let mut config = StyleConfig::default();
        config.basic_text.body.size = 200;
        assert!(render_to_docx(&config).is_err());
    }

    #[test]
    fn every_preset_renders() {
        for name in ["academic", "report", "novel", "resume", "letter", "default"] {
            render_to_docx(&get_preset(name)).unwrap();
        }
    }

    #[test]
    fn landscape_config_renders() {
        let mut config = StyleConfig::default();
        config.page_settings.orientation = Orientation::Landscape;
        config.page_settings.header.text = "Sample header".to_string();
        config.page_settings.footer.text = "Page".to_string();
        render_to_docx(&config).unwrap();
    }
}
