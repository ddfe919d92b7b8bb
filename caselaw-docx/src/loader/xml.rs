//! roxmltree helpers for WordprocessingML

use roxmltree::Node;

pub const WML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub const DML_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const WPD_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const VML_NS: &str = "urn:schemas-microsoft-com:vml";
pub const MC_NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Whether `node` is the element `name` in namespace `ns`
pub fn is_element(node: Node, ns: &str, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(ns)
}

/// Whether `node` is the WordprocessingML element `name`
pub fn is_wml(node: Node, name: &str) -> bool {
    is_element(node, WML_NS, name)
}

/// First WordprocessingML child called `name`
pub fn wml<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_wml(*n, name))
}

/// First child called `name` in namespace `ns`
pub fn child<'a, 'input>(node: Node<'a, 'input>, ns: &str, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| is_element(*n, ns, name))
}

/// First descendant called `name` in namespace `ns`
pub fn descendant<'a, 'input>(
    node: Node<'a, 'input>,
    ns: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants().find(|n| is_element(*n, ns, name))
}

/// A `w:` attribute
pub fn attr<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute((WML_NS, name))
}

/// The `w:val` attribute of the child `name`
pub fn wml_val<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    wml(node, name).and_then(|n| attr(n, "val"))
}

/// An OOXML on/off value; a missing value means on
pub fn on_off(value: Option<&str>) -> bool {
    !matches!(value, Some("0") | Some("false") | Some("off"))
}

/// A toggle property such as `w:b`; `None` when the element is absent
pub fn wml_bool(node: Node, name: &str) -> Option<bool> {
    wml(node, name).map(|n| on_off(attr(n, "val")))
}

/// Local element name, used for diagnostics
pub fn local_name(node: Node) -> String {
    node.tag_name().name().to_string()
}
