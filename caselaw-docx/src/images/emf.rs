//! Enhanced Metafile to SVG translation
//!
//! Replays the drawing records of an EMF against a small device context
//! (mapping mode, world transform, selected pen and brush) and writes the
//! result as SVG elements in device coordinates. Records without a visual
//! counterpart here (text, clipping, palettes, ...) are skipped.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Cursor;
use thiserror::Error;

/// `" EMF"` signature in the header record
const EMF_SIGNATURE: u32 = 0x464D_4520;

/// High bit marking stock object indices
const STOCK_OBJECT: u32 = 0x8000_0000;

const EMR_HEADER: u32 = 0x01;
const EMR_POLYBEZIER: u32 = 0x02;
const EMR_POLYGON: u32 = 0x03;
const EMR_POLYLINE: u32 = 0x04;
const EMR_POLYBEZIERTO: u32 = 0x05;
const EMR_POLYLINETO: u32 = 0x06;
const EMR_POLYPOLYLINE: u32 = 0x07;
const EMR_POLYPOLYGON: u32 = 0x08;
const EMR_SETWINDOWEXTEX: u32 = 0x09;
const EMR_SETWINDOWORGEX: u32 = 0x0A;
const EMR_SETVIEWPORTEXTEX: u32 = 0x0B;
const EMR_SETVIEWPORTORGEX: u32 = 0x0C;
const EMR_EOF: u32 = 0x0E;
const EMR_SETPOLYFILLMODE: u32 = 0x13;
const EMR_MOVETOEX: u32 = 0x1B;
const EMR_SAVEDC: u32 = 0x21;
const EMR_RESTOREDC: u32 = 0x22;
const EMR_SETWORLDTRANSFORM: u32 = 0x23;
const EMR_MODIFYWORLDTRANSFORM: u32 = 0x24;
const EMR_SELECTOBJECT: u32 = 0x25;
const EMR_CREATEPEN: u32 = 0x26;
const EMR_CREATEBRUSHINDIRECT: u32 = 0x27;
const EMR_DELETEOBJECT: u32 = 0x28;
const EMR_ELLIPSE: u32 = 0x2A;
const EMR_RECTANGLE: u32 = 0x2B;
const EMR_ROUNDRECT: u32 = 0x2C;
const EMR_LINETO: u32 = 0x36;
const EMR_BEGINPATH: u32 = 0x3B;
const EMR_ENDPATH: u32 = 0x3C;
const EMR_CLOSEFIGURE: u32 = 0x3D;
const EMR_FILLPATH: u32 = 0x3E;
const EMR_STROKEANDFILLPATH: u32 = 0x3F;
const EMR_STROKEPATH: u32 = 0x40;
const EMR_ABORTPATH: u32 = 0x44;
const EMR_STRETCHDIBITS: u32 = 0x51;
const EMR_POLYBEZIER16: u32 = 0x55;
const EMR_POLYGON16: u32 = 0x56;
const EMR_POLYLINE16: u32 = 0x57;
const EMR_POLYBEZIERTO16: u32 = 0x58;
const EMR_POLYLINETO16: u32 = 0x59;
const EMR_POLYPOLYLINE16: u32 = 0x5A;
const EMR_POLYPOLYGON16: u32 = 0x5B;
const EMR_EXTCREATEPEN: u32 = 0x5F;

/// EMF parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmfError {
    #[error("Data too short for an EMF header")]
    TooShort,

    #[error("Missing EMF signature")]
    BadSignature,

    #[error("Metafile bounds are empty")]
    EmptyBounds,

    #[error("Malformed record at offset {offset}")]
    MalformedRecord { offset: usize },
}

/// Rectangle in device units, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Bounds {
    /// Width in device units, computed wide so hostile headers cannot overflow
    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left) + 1
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top) + 1
    }
}

/// Read the bounds from the header record
pub fn read_bounds(data: &[u8]) -> Result<Bounds, EmfError> {
    if data.len() < 44 || read_u32(data, 0) != Some(EMR_HEADER) {
        return Err(EmfError::TooShort);
    }
    if read_u32(data, 40) != Some(EMF_SIGNATURE) {
        return Err(EmfError::BadSignature);
    }
    let bounds = read_rect(data, 8).ok_or(EmfError::TooShort)?;
    if bounds.width() <= 0 || bounds.height() <= 0 {
        return Err(EmfError::EmptyBounds);
    }
    Ok(bounds)
}

/// Translate an EMF into an SVG document
///
/// # Parameters
/// * `data` - Raw EMF bytes
///
/// # Returns
/// * `Ok((String, Bounds))` - SVG markup and the metafile bounds
/// * `Err(EmfError)` - The data is not a readable EMF
pub fn emf_to_svg(data: &[u8]) -> Result<(String, Bounds), EmfError> {
    let bounds = read_bounds(data)?;
    let mut translator = Translator::default();

    let mut offset = 0;
    while offset + 8 <= data.len() {
        let kind = read_u32(data, offset).ok_or(EmfError::MalformedRecord { offset })?;
        let size = read_u32(data, offset + 4).ok_or(EmfError::MalformedRecord { offset })? as usize;
        if size < 8 || offset + size > data.len() {
            return Err(EmfError::MalformedRecord { offset });
        }
        let record = &data[offset..offset + size];
        if kind == EMR_EOF {
            break;
        }
        translator.record(kind, record);
        offset += size;
    }

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\" preserveAspectRatio=\"none\">",
        x = bounds.left,
        y = bounds.top,
        w = bounds.width(),
        h = bounds.height()
    );
    for element in &translator.elements {
        svg.push_str(element);
    }
    svg.push_str("</svg>");
    Ok((svg, bounds))
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_i32(data: &[u8], offset: usize) -> Option<i32> {
    read_u32(data, offset).map(|v| v as i32)
}

fn read_i16(data: &[u8], offset: usize) -> Option<i16> {
    let bytes = data.get(offset..offset + 2)?;
    Some(i16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_f32(data: &[u8], offset: usize) -> Option<f32> {
    read_u32(data, offset).map(f32::from_bits)
}

fn read_rect(data: &[u8], offset: usize) -> Option<Bounds> {
    Some(Bounds {
        left: read_i32(data, offset)?,
        top: read_i32(data, offset + 4)?,
        right: read_i32(data, offset + 8)?,
        bottom: read_i32(data, offset + 12)?,
    })
}

fn read_point(data: &[u8], offset: usize, wide: bool) -> Option<(f64, f64)> {
    if wide {
        Some((read_i32(data, offset)? as f64, read_i32(data, offset + 4)? as f64))
    } else {
        Some((read_i16(data, offset)? as f64, read_i16(data, offset + 2)? as f64))
    }
}

/// COLORREF as `#RRGGBB`
fn color(value: u32) -> String {
    let [r, g, b, _] = value.to_le_bytes();
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

#[derive(Debug, Clone)]
struct Pen {
    color: String,
    width: f64,
    visible: bool,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 1.0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone)]
struct Brush {
    color: String,
    visible: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: "#FFFFFF".to_string(),
            visible: true,
        }
    }
}

#[derive(Debug, Clone)]
enum GdiObject {
    Pen(Pen),
    Brush(Brush),
}

fn stock_object(index: u32) -> Option<GdiObject> {
    let brush = |color: &str| {
        Some(GdiObject::Brush(Brush {
            color: color.to_string(),
            visible: true,
        }))
    };
    let pen = |color: &str, visible| {
        Some(GdiObject::Pen(Pen {
            color: color.to_string(),
            width: 1.0,
            visible,
        }))
    };
    match index & !STOCK_OBJECT {
        0 => brush("#FFFFFF"),
        1 => brush("#C0C0C0"),
        2 => brush("#808080"),
        3 => brush("#404040"),
        4 => brush("#000000"),
        5 => Some(GdiObject::Brush(Brush {
            color: String::new(),
            visible: false,
        })),
        6 => pen("#FFFFFF", true),
        7 => pen("#000000", true),
        8 => pen("", false),
        _ => None,
    }
}

/// Affine transform `[m11, m12, m21, m22, dx, dy]`
type Transform = [f64; 6];

const IDENTITY: Transform = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(a: &Transform, b: &Transform) -> Transform {
    [
        a[0] * b[0] + a[1] * b[2],
        a[0] * b[1] + a[1] * b[3],
        a[2] * b[0] + a[3] * b[2],
        a[2] * b[1] + a[3] * b[3],
        a[4] * b[0] + a[5] * b[2] + b[4],
        a[4] * b[1] + a[5] * b[3] + b[5],
    ]
}

#[derive(Debug, Clone)]
struct DeviceContext {
    window_org: (f64, f64),
    window_ext: Option<(f64, f64)>,
    viewport_org: (f64, f64),
    viewport_ext: Option<(f64, f64)>,
    world: Transform,
    pen: Pen,
    brush: Brush,
    fill_rule: &'static str,
    position: (f64, f64),
}

impl Default for DeviceContext {
    fn default() -> Self {
        Self {
            window_org: (0.0, 0.0),
            window_ext: None,
            viewport_org: (0.0, 0.0),
            viewport_ext: None,
            world: IDENTITY,
            pen: Pen::default(),
            brush: Brush::default(),
            fill_rule: "evenodd",
            position: (0.0, 0.0),
        }
    }
}

impl DeviceContext {
    fn scale(&self) -> (f64, f64) {
        match (self.window_ext, self.viewport_ext) {
            (Some((wx, wy)), Some((vx, vy))) if wx != 0.0 && wy != 0.0 => (vx / wx, vy / wy),
            _ => (1.0, 1.0),
        }
    }

    /// Logical to device coordinates
    fn map(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let w = &self.world;
        let wx = w[0] * x + w[2] * y + w[4];
        let wy = w[1] * x + w[3] * y + w[5];
        let (sx, sy) = self.scale();
        (
            (wx - self.window_org.0) * sx + self.viewport_org.0,
            (wy - self.window_org.1) * sy + self.viewport_org.1,
        )
    }

    fn stroke_width(&self) -> f64 {
        let world = (self.world[0] * self.world[0] + self.world[1] * self.world[1]).sqrt();
        (self.pen.width * world * self.scale().0.abs()).max(1.0)
    }

    fn stroke_attributes(&self) -> String {
        if self.pen.visible {
            format!(
                " stroke=\"{}\" stroke-width=\"{:.2}\"",
                self.pen.color,
                self.stroke_width()
            )
        } else {
            " stroke=\"none\"".to_string()
        }
    }

    fn fill_attributes(&self) -> String {
        if self.brush.visible {
            format!(" fill=\"{}\" fill-rule=\"{}\"", self.brush.color, self.fill_rule)
        } else {
            " fill=\"none\"".to_string()
        }
    }
}

#[derive(Debug, Default)]
struct Translator {
    dc: DeviceContext,
    saved: Vec<DeviceContext>,
    objects: HashMap<u32, GdiObject>,
    /// Path data collected between BeginPath and EndPath
    path: Option<String>,
    /// Finished path waiting for a fill or stroke record
    pending_path: Option<String>,
    elements: Vec<String>,
}

impl Translator {
    fn record(&mut self, kind: u32, record: &[u8]) {
        let data = &record[8..];
        match kind {
            EMR_POLYGON | EMR_POLYGON16 => {
                self.poly(data, kind == EMR_POLYGON, true);
            }
            EMR_POLYLINE | EMR_POLYLINE16 | EMR_POLYBEZIER | EMR_POLYBEZIER16 => {
                let bezier = matches!(kind, EMR_POLYBEZIER | EMR_POLYBEZIER16);
                let wide = matches!(kind, EMR_POLYLINE | EMR_POLYBEZIER);
                if bezier {
                    self.bezier(data, wide, false);
                } else {
                    self.poly(data, wide, false);
                }
            }
            EMR_POLYLINETO | EMR_POLYLINETO16 => {
                self.line_to_points(data, kind == EMR_POLYLINETO);
            }
            EMR_POLYBEZIERTO | EMR_POLYBEZIERTO16 => {
                self.bezier(data, kind == EMR_POLYBEZIERTO, true);
            }
            EMR_POLYPOLYLINE | EMR_POLYPOLYLINE16 => {
                self.poly_poly(data, kind == EMR_POLYPOLYLINE, false);
            }
            EMR_POLYPOLYGON | EMR_POLYPOLYGON16 => {
                self.poly_poly(data, kind == EMR_POLYPOLYGON, true);
            }
            EMR_SETWINDOWEXTEX => {
                if let Some(ext) = read_point(data, 0, true) {
                    self.dc.window_ext = Some(ext);
                }
            }
            EMR_SETWINDOWORGEX => {
                if let Some(org) = read_point(data, 0, true) {
                    self.dc.window_org = org;
                }
            }
            EMR_SETVIEWPORTEXTEX => {
                if let Some(ext) = read_point(data, 0, true) {
                    self.dc.viewport_ext = Some(ext);
                }
            }
            EMR_SETVIEWPORTORGEX => {
                if let Some(org) = read_point(data, 0, true) {
                    self.dc.viewport_org = org;
                }
            }
            EMR_SETPOLYFILLMODE => {
                self.dc.fill_rule = match read_u32(data, 0) {
                    Some(2) => "nonzero",
                    _ => "evenodd",
                };
            }
            EMR_MOVETOEX => {
                if let Some(point) = read_point(data, 0, true) {
                    self.dc.position = point;
                    if let Some(path) = self.path.as_mut() {
                        let (x, y) = self.dc.map(point);
                        let _ = write!(path, "M{:.2} {:.2} ", x, y);
                    }
                }
            }
            EMR_LINETO => {
                if let Some(point) = read_point(data, 0, true) {
                    self.line_to(point);
                }
            }
            EMR_SAVEDC => self.saved.push(self.dc.clone()),
            EMR_RESTOREDC => {
                let relative = read_i32(data, 0).unwrap_or(-1);
                let depth = relative.unsigned_abs() as usize;
                if relative < 0 && depth <= self.saved.len() {
                    let keep = self.saved.len() - depth;
                    if let Some(dc) = self.saved.drain(keep..).next() {
                        self.dc = dc;
                    }
                }
            }
            EMR_SETWORLDTRANSFORM => {
                if let Some(transform) = read_transform(data, 0) {
                    self.dc.world = transform;
                }
            }
            EMR_MODIFYWORLDTRANSFORM => {
                let transform = read_transform(data, 0);
                match (read_u32(data, 24), transform) {
                    (Some(1), _) => self.dc.world = IDENTITY,
                    (Some(2), Some(t)) => self.dc.world = multiply(&t, &self.dc.world),
                    (Some(3), Some(t)) => self.dc.world = multiply(&self.dc.world, &t),
                    (Some(4), Some(t)) => self.dc.world = t,
                    _ => {}
                }
            }
            EMR_SELECTOBJECT => {
                if let Some(index) = read_u32(data, 0) {
                    let object = if index & STOCK_OBJECT != 0 {
                        stock_object(index)
                    } else {
                        self.objects.get(&index).cloned()
                    };
                    match object {
                        Some(GdiObject::Pen(pen)) => self.dc.pen = pen,
                        Some(GdiObject::Brush(brush)) => self.dc.brush = brush,
                        None => {}
                    }
                }
            }
            EMR_CREATEPEN => {
                if let (Some(index), Some(style), Some(width), Some(rgb)) = (
                    read_u32(data, 0),
                    read_u32(data, 4),
                    read_i32(data, 8),
                    read_u32(data, 16),
                ) {
                    self.objects.insert(index, GdiObject::Pen(pen(style, width, rgb)));
                }
            }
            EMR_EXTCREATEPEN => {
                if let (Some(index), Some(style), Some(width), Some(rgb)) = (
                    read_u32(data, 0),
                    read_u32(data, 20),
                    read_i32(data, 24),
                    read_u32(data, 32),
                ) {
                    self.objects.insert(index, GdiObject::Pen(pen(style, width, rgb)));
                }
            }
            EMR_CREATEBRUSHINDIRECT => {
                if let (Some(index), Some(style), Some(rgb)) =
                    (read_u32(data, 0), read_u32(data, 4), read_u32(data, 8))
                {
                    let brush = Brush {
                        color: color(rgb),
                        visible: style != 1,
                    };
                    self.objects.insert(index, GdiObject::Brush(brush));
                }
            }
            EMR_DELETEOBJECT => {
                if let Some(index) = read_u32(data, 0) {
                    self.objects.remove(&index);
                }
            }
            EMR_RECTANGLE | EMR_ROUNDRECT | EMR_ELLIPSE => self.shape(kind, data),
            EMR_BEGINPATH => self.path = Some(String::new()),
            EMR_ENDPATH => self.pending_path = self.path.take(),
            EMR_ABORTPATH => {
                self.path = None;
                self.pending_path = None;
            }
            EMR_CLOSEFIGURE => {
                if let Some(path) = self.path.as_mut() {
                    path.push_str("Z ");
                }
            }
            EMR_FILLPATH | EMR_STROKEPATH | EMR_STROKEANDFILLPATH => {
                if let Some(d) = self.pending_path.take() {
                    let fill = if kind == EMR_STROKEPATH {
                        " fill=\"none\"".to_string()
                    } else {
                        self.dc.fill_attributes()
                    };
                    let stroke = if kind == EMR_FILLPATH {
                        " stroke=\"none\"".to_string()
                    } else {
                        self.dc.stroke_attributes()
                    };
                    self.elements
                        .push(format!("<path d=\"{}\"{}{}/>", d.trim_end(), fill, stroke));
                }
            }
            EMR_STRETCHDIBITS => self.stretch_dib(record),
            _ => log::trace!("Skipping EMF record 0x{:02X}", kind),
        }
    }

    fn points(&self, data: &[u8], offset: usize, count: usize, wide: bool) -> Option<Vec<(f64, f64)>> {
        let step = if wide { 8 } else { 4 };
        (0..count)
            .map(|i| read_point(data, offset + i * step, wide).map(|p| self.dc.map(p)))
            .collect()
    }

    fn emit_points(&mut self, points: &[(f64, f64)], closed: bool) {
        if points.is_empty() {
            return;
        }
        let mut d = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            let command = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{}{:.2} {:.2} ", command, x, y);
        }
        if closed {
            d.push_str("Z ");
        }
        match self.path.as_mut() {
            Some(path) => path.push_str(&d),
            None => {
                let fill = if closed {
                    self.dc.fill_attributes()
                } else {
                    " fill=\"none\"".to_string()
                };
                self.elements.push(format!(
                    "<path d=\"{}\"{}{}/>",
                    d.trim_end(),
                    fill,
                    self.dc.stroke_attributes()
                ));
            }
        }
    }

    fn poly(&mut self, data: &[u8], wide: bool, closed: bool) {
        let Some(count) = read_u32(data, 16) else {
            return;
        };
        if let Some(points) = self.points(data, 20, count as usize, wide) {
            self.emit_points(&points, closed);
        }
    }

    fn poly_poly(&mut self, data: &[u8], wide: bool, closed: bool) {
        let (Some(polygons), Some(_total)) = (read_u32(data, 16), read_u32(data, 20)) else {
            return;
        };
        let polygons = polygons as usize;
        let mut offset = 24 + polygons * 4;
        let step = if wide { 8 } else { 4 };
        for i in 0..polygons {
            let Some(count) = read_u32(data, 24 + i * 4) else {
                return;
            };
            let count = count as usize;
            match self.points(data, offset, count, wide) {
                Some(points) => self.emit_points(&points, closed),
                None => return,
            }
            offset += count * step;
        }
    }

    fn line_to(&mut self, point: (f64, f64)) {
        let from = self.dc.map(self.dc.position);
        let to = self.dc.map(point);
        self.dc.position = point;
        match self.path.as_mut() {
            Some(path) => {
                let _ = write!(path, "L{:.2} {:.2} ", to.0, to.1);
            }
            None => self.elements.push(format!(
                "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\"{}/>",
                from.0,
                from.1,
                to.0,
                to.1,
                self.dc.stroke_attributes()
            )),
        }
    }

    fn line_to_points(&mut self, data: &[u8], wide: bool) {
        let Some(count) = read_u32(data, 16) else {
            return;
        };
        let step = if wide { 8 } else { 4 };
        for i in 0..count as usize {
            match read_point(data, 20 + i * step, wide) {
                Some(point) => self.line_to(point),
                None => return,
            }
        }
    }

    fn bezier(&mut self, data: &[u8], wide: bool, from_position: bool) {
        let Some(count) = read_u32(data, 16) else {
            return;
        };
        let Some(points) = self.points(data, 20, count as usize, wide) else {
            return;
        };
        let (start, rest) = if from_position {
            (self.dc.map(self.dc.position), points.as_slice())
        } else {
            match points.split_first() {
                Some((first, rest)) => (*first, rest),
                None => return,
            }
        };
        let mut curves = String::new();
        for segment in rest.chunks_exact(3) {
            let _ = write!(
                curves,
                "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
                segment[0].0, segment[0].1, segment[1].0, segment[1].1, segment[2].0, segment[2].1
            );
        }
        if from_position {
            let step = if wide { 8 } else { 4 };
            let last = 20 + (count as usize).saturating_sub(1) * step;
            if let Some(point) = read_point(data, last, wide) {
                self.dc.position = point;
            }
        }
        match self.path.as_mut() {
            // a bezier-to continues the current figure
            Some(path) if from_position => path.push_str(&curves),
            Some(path) => {
                let _ = write!(path, "M{:.2} {:.2} {}", start.0, start.1, curves);
            }
            None => self.elements.push(format!(
                "<path d=\"M{:.2} {:.2} {}\" fill=\"none\"{}/>",
                start.0,
                start.1,
                curves.trim_end(),
                self.dc.stroke_attributes()
            )),
        }
    }

    fn shape(&mut self, kind: u32, data: &[u8]) {
        let Some(rect) = read_rect(data, 0) else {
            return;
        };
        let (x1, y1) = self.dc.map((rect.left as f64, rect.top as f64));
        let (x2, y2) = self.dc.map((rect.right as f64, rect.bottom as f64));
        let (x, y) = (x1.min(x2), y1.min(y2));
        let (width, height) = ((x2 - x1).abs(), (y2 - y1).abs());
        let style = format!(
            "{}{}",
            self.dc.fill_attributes(),
            self.dc.stroke_attributes()
        );
        let element = match kind {
            EMR_ELLIPSE => format!(
                "<ellipse cx=\"{:.2}\" cy=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\"{}/>",
                x + width / 2.0,
                y + height / 2.0,
                width / 2.0,
                height / 2.0,
                style
            ),
            EMR_ROUNDRECT => {
                let corner = read_point(data, 16, true).unwrap_or((0.0, 0.0));
                let (sx, sy) = self.dc.scale();
                format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{:.2}\" ry=\"{:.2}\"{}/>",
                    x,
                    y,
                    width,
                    height,
                    (corner.0 * sx).abs() / 2.0,
                    (corner.1 * sy).abs() / 2.0,
                    style
                )
            }
            _ => format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\"{}/>",
                x, y, width, height, style
            ),
        };
        self.elements.push(element);
    }

    /// Embedded device independent bitmap, re-encoded as PNG
    fn stretch_dib(&mut self, record: &[u8]) {
        let data = &record[8..];
        let fields = (
            read_i32(data, 16),
            read_i32(data, 20),
            read_u32(data, 40),
            read_u32(data, 44),
            read_u32(data, 48),
            read_u32(data, 52),
            read_i32(data, 64),
            read_i32(data, 68),
        );
        let (
            Some(x),
            Some(y),
            Some(bmi_offset),
            Some(bmi_size),
            Some(bits_offset),
            Some(bits_size),
            Some(width),
            Some(height),
        ) = fields
        else {
            return;
        };
        let (bmi_offset, bits_offset) = (bmi_offset as usize, bits_offset as usize);
        let bmi = record.get(bmi_offset..bmi_offset + bmi_size as usize);
        let bits = record.get(bits_offset..bits_offset + bits_size as usize);
        let (Some(bmi), Some(bits)) = (bmi, bits) else {
            return;
        };
        let Some(png) = dib_to_png(bmi, bits) else {
            log::debug!("Skipping undecodable EMF bitmap");
            return;
        };
        let (x1, y1) = self.dc.map((x as f64, y as f64));
        let (x2, y2) = self.dc.map(((x + width) as f64, (y + height) as f64));
        self.elements.push(format!(
            "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" preserveAspectRatio=\"none\" href=\"data:image/png;base64,{}\"/>",
            x1.min(x2),
            y1.min(y2),
            (x2 - x1).abs(),
            (y2 - y1).abs(),
            STANDARD.encode(png)
        ));
    }
}

fn pen(style: u32, width: i32, rgb: u32) -> Pen {
    // PS_NULL in the low style bits
    Pen {
        color: color(rgb),
        width: width.max(1) as f64,
        visible: style & 0x0F != 5,
    }
}

fn read_transform(data: &[u8], offset: usize) -> Option<Transform> {
    let mut transform = IDENTITY;
    for (i, value) in transform.iter_mut().enumerate() {
        *value = read_f32(data, offset + i * 4)? as f64;
    }
    Some(transform)
}

/// Prefix a BMP file header and decode with the `image` crate
fn dib_to_png(bmi: &[u8], bits: &[u8]) -> Option<Vec<u8>> {
    let pixel_offset = 14 + bmi.len() as u32;
    let file_size = pixel_offset + bits.len() as u32;
    let mut bmp = Vec::with_capacity(file_size as usize);
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&file_size.to_le_bytes());
    bmp.extend_from_slice(&[0, 0, 0, 0]);
    bmp.extend_from_slice(&pixel_offset.to_le_bytes());
    bmp.extend_from_slice(bmi);
    bmp.extend_from_slice(bits);

    let decoded = image::load_from_memory_with_format(&bmp, image::ImageFormat::Bmp).ok()?;
    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, image::ImageFormat::Png).ok()?;
    Some(png.into_inner())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(kind: u32, payload: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&kind.to_le_bytes());
        bytes.extend_from_slice(&((payload.len() + 8) as u32).to_le_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn words(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    pub(crate) fn header(width: i32, height: i32) -> Vec<u8> {
        let mut payload = words(&[0, 0, width - 1, height - 1, 0, 0, 1000, 1000]);
        payload.extend_from_slice(&EMF_SIGNATURE.to_le_bytes());
        payload.resize(80, 0);
        record(EMR_HEADER, &payload)
    }

    /// A metafile with a red filled rectangle
    pub(crate) fn red_rectangle_emf() -> Vec<u8> {
        let mut emf = header(100, 50);
        emf.extend(record(
            EMR_CREATEBRUSHINDIRECT,
            &words(&[1, 0, 0x0000_00FF, 0]),
        ));
        emf.extend(record(EMR_SELECTOBJECT, &words(&[1])));
        emf.extend(record(EMR_RECTANGLE, &words(&[10, 10, 90, 40])));
        emf.extend(record(EMR_EOF, &words(&[0, 16, 20])));
        emf
    }

    #[test]
    fn test_reads_bounds() {
        let bounds = read_bounds(&header(100, 50)).unwrap();
        assert_eq!(bounds.width(), 100);
        assert_eq!(bounds.height(), 50);
    }

    #[test]
    fn test_extreme_bounds_do_not_overflow() {
        let mut payload = words(&[i32::MIN, 0, i32::MAX, 9, 0, 0, 1000, 1000]);
        payload.extend_from_slice(&EMF_SIGNATURE.to_le_bytes());
        payload.resize(80, 0);
        let bounds = read_bounds(&record(EMR_HEADER, &payload)).unwrap();
        assert_eq!(bounds.width(), 1 << 32);
        assert_eq!(bounds.height(), 10);

        let mut payload = words(&[i32::MAX, 0, i32::MIN, 9, 0, 0, 1000, 1000]);
        payload.extend_from_slice(&EMF_SIGNATURE.to_le_bytes());
        payload.resize(80, 0);
        assert_eq!(
            read_bounds(&record(EMR_HEADER, &payload)),
            Err(EmfError::EmptyBounds)
        );
    }

    #[test]
    fn test_rejects_missing_signature() {
        let mut emf = header(10, 10);
        emf[40] = 0;
        assert_eq!(read_bounds(&emf), Err(EmfError::BadSignature));
        assert_eq!(read_bounds(b"short"), Err(EmfError::TooShort));
    }

    #[test]
    fn test_rectangle_uses_selected_brush() {
        let (svg, _) = emf_to_svg(&red_rectangle_emf()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(
            "<rect x=\"10.00\" y=\"10.00\" width=\"80.00\" height=\"30.00\" fill=\"#FF0000\""
        ));
    }

    #[test]
    fn test_window_to_viewport_mapping() {
        let mut emf = header(100, 100);
        emf.extend(record(EMR_SETWINDOWEXTEX, &words(&[1000, 1000])));
        emf.extend(record(EMR_SETVIEWPORTEXTEX, &words(&[100, 100])));
        emf.extend(record(EMR_SELECTOBJECT, &words(&[STOCK_OBJECT as i32 | 5])));
        emf.extend(record(EMR_ELLIPSE, &words(&[0, 0, 500, 1000])));
        let (svg, _) = emf_to_svg(&emf).unwrap();
        assert!(svg.contains(
            "<ellipse cx=\"25.00\" cy=\"50.00\" rx=\"25.00\" ry=\"50.00\" fill=\"none\""
        ));
    }

    #[test]
    fn test_path_bracket() {
        let mut emf = header(20, 20);
        emf.extend(record(EMR_BEGINPATH, &[]));
        emf.extend(record(EMR_MOVETOEX, &words(&[0, 0])));
        emf.extend(record(EMR_LINETO, &words(&[10, 0])));
        emf.extend(record(EMR_LINETO, &words(&[10, 10])));
        emf.extend(record(EMR_CLOSEFIGURE, &[]));
        emf.extend(record(EMR_ENDPATH, &[]));
        emf.extend(record(EMR_STROKEPATH, &words(&[0, 0, 10, 10])));
        let (svg, _) = emf_to_svg(&emf).unwrap();
        assert!(svg.contains(
            "<path d=\"M0.00 0.00 L10.00 0.00 L10.00 10.00 Z\" fill=\"none\" stroke=\"#000000\""
        ));
    }

    #[test]
    fn test_truncated_record_is_an_error() {
        let mut emf = header(10, 10);
        emf.extend_from_slice(&EMR_RECTANGLE.to_le_bytes());
        emf.extend_from_slice(&400u32.to_le_bytes());
        assert!(matches!(
            emf_to_svg(&emf),
            Err(EmfError::MalformedRecord { .. })
        ));
    }
}
