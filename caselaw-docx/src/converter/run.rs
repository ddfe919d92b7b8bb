//! Run conversion

use super::image;
use super::table::RegionStyle;
use super::ConversionContext;
use crate::diagnostics::UnhandledKind;
use crate::document_model::{ErrorElement, RunElement, TextElement, VerticalAlign};
use crate::error::ConverterError;
use crate::source_model::{Run, RunContent, RunProperties};

const NON_BREAKING_HYPHEN: &str = "\u{2011}";

/// Convert the content items of one run
///
/// # Parameters
/// * `run` - The source run
/// * `paragraph_style` - Named style of the enclosing paragraph
/// * `region` - Table style region of the enclosing cell, if any
/// * `ctx` - Conversion context
///
/// # Returns
/// * `Ok(Vec<RunElement>)` - Converted elements in source order
/// * `Err(ConverterError)` - A drawing violated a structural requirement
pub(crate) fn convert_run(
    run: &Run,
    paragraph_style: Option<&str>,
    region: Option<&RegionStyle>,
    ctx: &mut ConversionContext,
) -> Result<Vec<RunElement>, ConverterError> {
    let properties = resolve_properties(run, paragraph_style, region, ctx);
    let mut elements = Vec::with_capacity(run.content.len());

    for item in &run.content {
        match item {
            RunContent::Text(text) => {
                elements.push(RunElement::Text(text_element(text, &properties)));
            }
            RunContent::Tab => elements.push(RunElement::Tab),
            RunContent::Break | RunContent::CarriageReturn => {
                elements.push(RunElement::LineBreak);
            }
            RunContent::NoBreakHyphen => {
                elements.push(RunElement::Text(text_element(
                    NON_BREAKING_HYPHEN,
                    &properties,
                )));
            }
            RunContent::SoftHyphen
            | RunContent::FieldChar
            | RunContent::InstrText(_)
            | RunContent::LastRenderedPageBreak => {}
            RunContent::Drawing(drawing) => {
                elements.push(image::convert_drawing(drawing, ctx)?);
            }
            RunContent::Picture(picture) => {
                elements.extend(image::convert_picture(picture, ctx));
            }
            RunContent::Other(name) => {
                ctx.diagnostics
                    .unhandled(ctx.location.clone(), name.as_str(), UnhandledKind::Run);
                elements.push(RunElement::Error(ErrorElement::new(name.as_str())));
            }
        }
    }

    Ok(elements)
}

/// Effective run properties
///
/// Own properties win over the character style, which wins over the
/// paragraph style, which wins over the table style region. Font sizes of
/// table style regions are never applied.
pub(crate) fn resolve_properties(
    run: &Run,
    paragraph_style: Option<&str>,
    region: Option<&RegionStyle>,
    ctx: &ConversionContext,
) -> RunProperties {
    let mut properties = run.properties.clone().unwrap_or_default();

    if let Some(character_style) = properties.style.clone() {
        if let Some(style) = ctx.styles.run_properties(&character_style) {
            properties.fill_from(&style);
        }
    }
    if let Some(style) = paragraph_style.and_then(|id| ctx.styles.run_properties(id)) {
        properties.fill_from(&style);
    }
    if let Some(region_properties) = region.and_then(|r| r.run_properties.as_ref()) {
        let size = properties.size;
        properties.fill_from(region_properties);
        properties.size = size;
    }

    properties
}

/// Build a text element from resolved properties
pub(crate) fn text_element(text: &str, properties: &RunProperties) -> TextElement {
    TextElement {
        text: text.to_string(),
        bold: properties.bold.unwrap_or(false),
        italic: properties.italic.unwrap_or(false),
        strike: properties.strike.unwrap_or(false),
        underline: properties.underline.clone(),
        vertical_align: match properties.vertical_align.as_deref() {
            Some("superscript") => Some(VerticalAlign::Superscript),
            Some("subscript") => Some(VerticalAlign::Subscript),
            _ => None,
        },
        size: properties.size.map(|half_points| half_points as f32 / 2.0),
        color: properties.color.as_deref().and_then(css_color),
        font_family: properties.font.clone(),
    }
}

/// CSS color of a hex color value, `None` for `auto`
pub(crate) fn css_color(value: &str) -> Option<String> {
    match value {
        "" | "auto" => None,
        hex => Some(format!("#{}", hex)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter_config::ConverterConfig;
    use crate::source_model::{DocxPackage, NamedStyle};

    fn package_with_style(id: &str, properties: RunProperties) -> DocxPackage {
        let mut package = DocxPackage::default();
        package.styles.insert(NamedStyle {
            id: id.into(),
            run_properties: Some(properties),
            ..NamedStyle::default()
        });
        package
    }

    fn convert(run: &Run, style: Option<&str>, package: &DocxPackage) -> Vec<RunElement> {
        let config = ConverterConfig::default();
        let mut ctx = ConversionContext::new(package, &config);
        convert_run(run, style, None, &mut ctx).unwrap()
    }

    #[test]
    fn test_content_dispatch() {
        let run = Run {
            properties: None,
            content: vec![
                RunContent::Text("a".into()),
                RunContent::Tab,
                RunContent::CarriageReturn,
                RunContent::NoBreakHyphen,
                RunContent::SoftHyphen,
                RunContent::FieldChar,
                RunContent::InstrText(" PAGE ".into()),
                RunContent::LastRenderedPageBreak,
                RunContent::Break,
            ],
        };
        let elements = convert(&run, None, &DocxPackage::default());
        assert_eq!(
            elements,
            vec![
                RunElement::Text(TextElement::new("a")),
                RunElement::Tab,
                RunElement::LineBreak,
                RunElement::Text(TextElement::new("\u{2011}")),
                RunElement::LineBreak,
            ]
        );
    }

    #[test]
    fn test_paragraph_style_fills_unset_properties() {
        let package = package_with_style(
            "Zitat",
            RunProperties {
                italic: Some(true),
                bold: Some(true),
                ..RunProperties::default()
            },
        );
        let run = Run {
            properties: Some(RunProperties {
                bold: Some(false),
                ..RunProperties::default()
            }),
            content: vec![RunContent::Text("x".into())],
        };
        match &convert(&run, Some("Zitat"), &package)[0] {
            RunElement::Text(text) => {
                assert!(text.italic);
                assert!(!text.bold);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_missing_style_contributes_nothing() {
        let run = Run::text("x");
        assert_eq!(
            convert(&run, Some("Unbekannt"), &DocxPackage::default()),
            vec![RunElement::Text(TextElement::new("x"))]
        );
    }

    #[test]
    fn test_region_font_size_is_not_applied() {
        let package = DocxPackage::default();
        let config = ConverterConfig::default();
        let ctx = ConversionContext::new(&package, &config);
        let region = RegionStyle {
            run_properties: Some(RunProperties {
                bold: Some(true),
                size: Some(32),
                ..RunProperties::default()
            }),
            alignment: None,
        };

        let properties = resolve_properties(&Run::text("x"), None, Some(&region), &ctx);
        assert_eq!(properties.bold, Some(true));
        assert_eq!(properties.size, None);
    }

    #[test]
    fn test_text_element_properties() {
        let text = text_element(
            "x",
            &RunProperties {
                vertical_align: Some("superscript".into()),
                size: Some(21),
                color: Some("auto".into()),
                ..RunProperties::default()
            },
        );
        assert_eq!(text.vertical_align, Some(VerticalAlign::Superscript));
        assert_eq!(text.size, Some(10.5));
        assert_eq!(text.color, None);
    }
}
