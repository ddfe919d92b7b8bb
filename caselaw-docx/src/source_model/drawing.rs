//! DrawingML and VML image nodes

/// A `w:drawing` node
///
/// Well-formed drawings hold exactly one inline or anchored payload.
#[derive(Debug, Clone, Default)]
pub struct Drawing {
    /// `wp:inline` / `wp:anchor` children
    pub items: Vec<DrawingItem>,
}

/// Payload of a drawing
#[derive(Debug, Clone)]
pub enum DrawingItem {
    /// Image flowing with the text
    Inline(InlineImage),
    /// Floating image
    Anchor(AnchorImage),
}

/// Drawing size in EMU (`wp:extent`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    /// Width in EMU
    pub cx: i64,
    /// Height in EMU
    pub cy: i64,
}

/// The picture referenced by `a:graphicData`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphicData {
    /// Image relationship id (`a:blip/@r:embed`)
    pub embed_id: Option<String>,
    /// Rotation in 60000ths of a degree (`a:xfrm/@rot`)
    pub rotation: Option<i64>,
    /// Alternative text (`wp:docPr/@descr`)
    pub description: Option<String>,
}

/// `wp:inline`
#[derive(Debug, Clone, Default)]
pub struct InlineImage {
    /// Display size
    pub extent: Option<Extent>,
    /// Graphic payload, `None` when `a:graphicData` is missing
    pub graphic: Option<GraphicData>,
}

/// `wp:anchor`
#[derive(Debug, Clone, Default)]
pub struct AnchorImage {
    /// Display size
    pub extent: Option<Extent>,
    /// Graphic payload, `None` when `a:graphicData` is missing
    pub graphic: Option<GraphicData>,
    /// Horizontal positioning (`wp:positionH`)
    pub horizontal_position: Option<HorizontalPosition>,
    /// Text wrapping mode
    pub wrap: Option<Wrap>,
}

/// `wp:positionH`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HorizontalPosition {
    /// `relativeFrom` attribute
    pub relative_from: Option<String>,
    /// `wp:align` text, e.g. `left`
    pub align: Option<String>,
    /// `wp:posOffset` in EMU
    pub offset: Option<i64>,
}

/// Text wrapping of an anchored drawing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrap {
    /// `wp:wrapSquare` with its `wrapText` side
    Square(Option<String>),
    /// `wp:wrapTight` with its `wrapText` side
    Tight(Option<String>),
    /// `wp:wrapThrough` with its `wrapText` side
    Through(Option<String>),
    /// `wp:wrapTopAndBottom`
    TopAndBottom,
    /// `wp:wrapNone`
    None,
}

impl Wrap {
    /// The `wrapText` side for wrap kinds that carry one
    pub fn wrap_text(&self) -> Option<&str> {
        match self {
            Wrap::Square(side) | Wrap::Tight(side) | Wrap::Through(side) => side.as_deref(),
            Wrap::TopAndBottom | Wrap::None => None,
        }
    }
}

/// A legacy `w:pict` node
#[derive(Debug, Clone, Default)]
pub struct Picture {
    /// VML children
    pub items: Vec<PictureItem>,
}

/// Child of a legacy picture
#[derive(Debug, Clone)]
pub enum PictureItem {
    /// `v:shape`
    Shape(VmlShape),
    /// `v:shapetype`, metadata only
    ShapeType,
    /// Anything else, carrying its element name
    Other(String),
}

/// `v:shape` with an embedded `v:imagedata`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmlShape {
    /// Inline style, e.g. `width:120pt;height:80pt`
    pub style: Option<String>,
    /// Image relationship id (`v:imagedata/@r:id`)
    pub image_id: Option<String>,
}
