//! Paragraph conversion

use super::run::convert_run;
use super::table::RegionStyle;
use super::ConversionContext;
use crate::diagnostics::UnhandledKind;
use crate::document_model::{Alignment, ErrorElement, ParagraphElement, RunElement};
use crate::error::ConverterError;
use crate::source_model::{Paragraph, ParagraphContent};

/// Convert a paragraph with its runs
///
/// Anchored images are moved in front of all other run elements, keeping
/// the order within both groups.
pub(crate) fn convert_paragraph(
    paragraph: &Paragraph,
    region: Option<&RegionStyle>,
    ctx: &mut ConversionContext,
) -> Result<ParagraphElement, ConverterError> {
    let mut element = ParagraphElement::default();
    let style_id = paragraph.style_id();

    if let Some(properties) = &paragraph.properties {
        element.style_reference = properties.style.clone();
        if properties
            .indentation
            .as_ref()
            .is_some_and(|i| i.left.is_some())
        {
            element
                .style
                .set("margin-left", format!("{}px", ctx.config.list_indent_px));
        }
    }
    if let Some(alignment) = resolve_alignment(paragraph, region, ctx) {
        element.set_alignment(alignment);
    }

    convert_content(&paragraph.content, style_id, region, &mut element.runs, ctx)?;
    element.runs.sort_by_key(|run| !run.is_anchored_image());

    Ok(element)
}

fn convert_content(
    content: &[ParagraphContent],
    style_id: Option<&str>,
    region: Option<&RegionStyle>,
    runs: &mut Vec<RunElement>,
    ctx: &mut ConversionContext,
) -> Result<(), ConverterError> {
    for item in content {
        match item {
            ParagraphContent::Run(run) => runs.extend(convert_run(run, style_id, region, ctx)?),
            ParagraphContent::Hyperlink(link) => {
                convert_content(&link.content, style_id, region, runs, ctx)?;
            }
            ParagraphContent::Other(name) => {
                ctx.diagnostics
                    .unhandled(ctx.location.clone(), name.as_str(), UnhandledKind::Paragraph);
                runs.push(RunElement::Error(ErrorElement::new(name.as_str())));
            }
        }
    }
    Ok(())
}

/// Direct justification, then the named style, then the table region
fn resolve_alignment(
    paragraph: &Paragraph,
    region: Option<&RegionStyle>,
    ctx: &ConversionContext,
) -> Option<Alignment> {
    let properties = paragraph.properties.as_ref();
    properties
        .and_then(|p| p.justification.as_deref())
        .and_then(Alignment::from_justification)
        .or_else(|| {
            properties
                .and_then(|p| p.style.as_deref())
                .and_then(|id| ctx.styles.justification(id))
                .and_then(|jc| Alignment::from_justification(&jc))
        })
        .or_else(|| region.and_then(|r| r.alignment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter_config::ConverterConfig;
    use crate::document_model::{FloatSide, ImageElement, TextElement};
    use crate::source_model::{
        DocxPackage, Hyperlink, Indentation, NamedStyle, ParagraphProperties, Run,
    };

    fn convert(paragraph: &Paragraph, package: &DocxPackage) -> ParagraphElement {
        let config = ConverterConfig::default();
        let mut ctx = ConversionContext::new(package, &config);
        convert_paragraph(paragraph, None, &mut ctx).unwrap()
    }

    fn centered_style() -> DocxPackage {
        let mut package = DocxPackage::default();
        package.styles.insert(NamedStyle {
            id: "Titel".into(),
            paragraph_properties: Some(ParagraphProperties {
                justification: Some("center".into()),
                ..ParagraphProperties::default()
            }),
            ..NamedStyle::default()
        });
        package
    }

    #[test]
    fn test_style_reference_and_indentation() {
        let paragraph = Paragraph {
            properties: Some(ParagraphProperties {
                style: Some("Standard".into()),
                indentation: Some(Indentation {
                    left: Some(1440),
                    ..Indentation::default()
                }),
                ..ParagraphProperties::default()
            }),
            ..Paragraph::from_runs(vec![Run::text("a")])
        };
        let element = convert(&paragraph, &DocxPackage::default());
        assert_eq!(element.style_reference.as_deref(), Some("Standard"));
        assert_eq!(element.style.get("margin-left"), Some("40px"));
    }

    #[test]
    fn test_direct_justification_wins_over_style() {
        let mut properties = ParagraphProperties {
            style: Some("Titel".into()),
            ..ParagraphProperties::default()
        };
        let from_style = convert(
            &Paragraph {
                properties: Some(properties.clone()),
                content: Vec::new(),
            },
            &centered_style(),
        );
        assert_eq!(from_style.alignment, Some(Alignment::Center));

        properties.justification = Some("both".into());
        let direct = convert(
            &Paragraph {
                properties: Some(properties),
                content: Vec::new(),
            },
            &centered_style(),
        );
        assert_eq!(direct.alignment, Some(Alignment::Justify));
    }

    #[test]
    fn test_region_alignment_is_lowest_priority() {
        let package = DocxPackage::default();
        let config = ConverterConfig::default();
        let mut ctx = ConversionContext::new(&package, &config);
        let region = RegionStyle {
            run_properties: None,
            alignment: Some(Alignment::Right),
        };
        let element =
            convert_paragraph(&Paragraph::default(), Some(&region), &mut ctx).unwrap();
        assert_eq!(element.alignment, Some(Alignment::Right));
    }

    #[test]
    fn test_hyperlink_runs_are_unwrapped() {
        let paragraph = Paragraph {
            properties: None,
            content: vec![
                ParagraphContent::Run(Run::text("siehe ")),
                ParagraphContent::Hyperlink(Hyperlink {
                    anchor: Some("Rn12".into()),
                    content: vec![
                        ParagraphContent::Run(Run::text("Rn. 12")),
                        ParagraphContent::Other("bookmarkStart".into()),
                    ],
                    ..Hyperlink::default()
                }),
            ],
        };
        let package = DocxPackage::default();
        let config = ConverterConfig::default();
        let mut ctx = ConversionContext::new(&package, &config);
        let element = convert_paragraph(&paragraph, None, &mut ctx).unwrap();

        assert_eq!(element.text(), "siehe Rn. 12");
        assert_eq!(ctx.diagnostics.unhandled.len(), 1);
        assert_eq!(ctx.diagnostics.unhandled[0].kind, UnhandledKind::Paragraph);
    }

    #[test]
    fn test_anchored_images_first() {
        let image = |anchored: bool| {
            RunElement::Image(ImageElement {
                anchored,
                float: anchored.then_some(FloatSide::Left),
                ..ImageElement::default()
            })
        };
        let mut runs = vec![
            RunElement::Text(TextElement::new("a")),
            image(false),
            image(true),
            RunElement::Text(TextElement::new("b")),
        ];
        runs.sort_by_key(|run| !run.is_anchored_image());
        assert_eq!(
            runs,
            vec![
                image(true),
                RunElement::Text(TextElement::new("a")),
                image(false),
                RunElement::Text(TextElement::new("b")),
            ]
        );
    }
}
