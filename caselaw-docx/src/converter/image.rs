//! Drawing and legacy picture conversion

use super::ConversionContext;
use crate::diagnostics::UnhandledKind;
use crate::document_model::{ErrorElement, FloatSide, ImageElement, RunElement};
use crate::error::ConverterError;
use crate::images::{nearest_rotation, prepare_image, ImageRequest};
use crate::source_model::{
    AnchorImage, Drawing, DrawingItem, Extent, GraphicData, ImagePart, Picture, PictureItem,
    VmlShape,
};
use crate::style::{parse_style_string, StyleMap};
use crate::units::{emu_to_pixel, pt_to_pixel};

/// Convert a `w:drawing` holding exactly one inline or anchored graphic
pub(crate) fn convert_drawing(
    drawing: &Drawing,
    ctx: &mut ConversionContext,
) -> Result<RunElement, ConverterError> {
    let [item] = drawing.items.as_slice() else {
        return Err(ConverterError::MultipleGraphicPayloads {
            count: drawing.items.len(),
        });
    };

    match item {
        DrawingItem::Inline(inline) => {
            let graphic = inline
                .graphic
                .as_ref()
                .ok_or(ConverterError::MissingGraphicData {
                    placement: "inline",
                })?;
            Ok(RunElement::Image(image_element(graphic, inline.extent, ctx)))
        }
        DrawingItem::Anchor(anchor) => {
            let graphic = anchor
                .graphic
                .as_ref()
                .ok_or(ConverterError::MissingGraphicData {
                    placement: "anchor",
                })?;
            let placement = match anchor_placement(anchor) {
                Ok(placement) => placement,
                Err(alignment) => {
                    ctx.diagnostics.warn(format!(
                        "Unsupported anchor alignment '{}' in {}",
                        alignment, ctx.location
                    ));
                    return Ok(RunElement::Error(ErrorElement::new(format!(
                        "Unsupported image alignment: {}",
                        alignment
                    ))));
                }
            };

            let mut image = image_element(graphic, anchor.extent, ctx);
            image.anchored = true;
            image.float = placement.float;
            if let Some(offset) = placement.margin_left {
                image.style.set("margin-left", format!("{}px", offset));
            }
            Ok(RunElement::Image(image))
        }
    }
}

/// Floating placement of an anchored image
#[derive(Debug, Default, PartialEq, Eq)]
struct Placement {
    float: Option<FloatSide>,
    margin_left: Option<i64>,
}

/// Placement from the horizontal alignment, or the wrap side without one
///
/// Returns the raw alignment value when it cannot be expressed.
fn anchor_placement(anchor: &AnchorImage) -> Result<Placement, String> {
    let mut placement = Placement::default();

    if let Some(position) = &anchor.horizontal_position {
        match position.align.as_deref() {
            Some("left") => placement.float = Some(FloatSide::Left),
            Some("right") => placement.float = Some(FloatSide::Right),
            Some(other) => return Err(other.to_string()),
            None => placement.margin_left = position.offset.map(emu_to_pixel),
        }
    }

    if placement.float.is_none() {
        placement.float = match anchor.wrap.as_ref().and_then(|w| w.wrap_text()) {
            Some("left") => Some(FloatSide::Right),
            Some("right") => Some(FloatSide::Left),
            _ => None,
        };
    }

    Ok(placement)
}

fn image_element(
    graphic: &GraphicData,
    extent: Option<Extent>,
    ctx: &mut ConversionContext,
) -> ImageElement {
    let width = extent.map(|e| emu_to_pixel(e.cx));
    let height = extent.map(|e| emu_to_pixel(e.cy));
    let request = ImageRequest {
        width,
        height,
        rotation: graphic.rotation,
        supersampling: ctx.config.emf_supersampling,
    };

    let quarter_turn = matches!(graphic.rotation.map(nearest_rotation), Some(90 | 270));
    let (width, height) = if quarter_turn {
        (height, width)
    } else {
        (width, height)
    };

    let prepared = prepare_image(lookup_part(graphic.embed_id.as_deref(), ctx), &request);
    ImageElement {
        content_type: prepared.content_type,
        data: prepared.data,
        width,
        height,
        anchored: false,
        float: None,
        alt: graphic.description.clone(),
        style: StyleMap::new(),
    }
}

fn lookup_part<'a>(
    id: Option<&str>,
    ctx: &mut ConversionContext<'a>,
) -> Option<&'a ImagePart> {
    let images = ctx.images;
    match id {
        Some(id) => {
            let part = images.get(id);
            if part.is_none() {
                ctx.diagnostics.warn(format!(
                    "Image {} referenced in {} is missing, using a placeholder",
                    id, ctx.location
                ));
            }
            part
        }
        None => None,
    }
}

/// Convert a legacy VML picture
///
/// Shape types only carry shared geometry and are skipped.
pub(crate) fn convert_picture(picture: &Picture, ctx: &mut ConversionContext) -> Vec<RunElement> {
    let mut elements = Vec::new();
    for item in &picture.items {
        match item {
            PictureItem::Shape(shape) if shape.image_id.is_some() => {
                elements.push(RunElement::Image(shape_image(shape, ctx)));
            }
            PictureItem::Shape(_) => {
                ctx.diagnostics
                    .unhandled(ctx.location.clone(), "shape", UnhandledKind::Picture);
                elements.push(RunElement::Error(ErrorElement::new("shape")));
            }
            PictureItem::ShapeType => {}
            PictureItem::Other(name) => {
                ctx.diagnostics
                    .unhandled(ctx.location.clone(), name.as_str(), UnhandledKind::Picture);
                elements.push(RunElement::Error(ErrorElement::new(name.as_str())));
            }
        }
    }
    elements
}

fn shape_image(shape: &VmlShape, ctx: &mut ConversionContext) -> ImageElement {
    let style = shape
        .style
        .as_deref()
        .map(parse_style_string)
        .map(StyleMap::from)
        .unwrap_or_default();
    let width = style.get("width").and_then(css_length_to_pixel);
    let height = style.get("height").and_then(css_length_to_pixel);
    let request = ImageRequest {
        width,
        height,
        rotation: None,
        supersampling: ctx.config.emf_supersampling,
    };

    let prepared = prepare_image(lookup_part(shape.image_id.as_deref(), ctx), &request);
    ImageElement {
        content_type: prepared.content_type,
        data: prepared.data,
        width,
        height,
        ..ImageElement::default()
    }
}

/// Pixel value of a VML length such as `120.5pt` or `80px`
fn css_length_to_pixel(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Some(points) = value.strip_suffix("pt") {
        return points
            .trim()
            .parse::<f32>()
            .ok()
            .map(|p| pt_to_pixel(p).round() as i64);
    }
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse::<f32>()
        .ok()
        .map(|p| p.round() as i64)
}
