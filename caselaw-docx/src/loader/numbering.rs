//! Numbering definitions part (`word/numbering.xml`)

use super::properties::run_properties;
use super::xml::{attr, is_wml, wml, wml_bool, wml_val};
use crate::source_model::{AbstractNumbering, LevelDefinition, NumberingInstance, NumberingRegistry};
use roxmltree::Node;
use std::collections::HashMap;

/// Parse the numbering definitions part into a registry
pub fn parse_numbering(xml: &str) -> Result<NumberingRegistry, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut registry = NumberingRegistry::new();

    for node in doc.root_element().children() {
        if is_wml(node, "abstractNum") {
            let Some(id) = attr(node, "abstractNumId") else {
                continue;
            };
            let levels = node
                .children()
                .filter(|n| is_wml(*n, "lvl"))
                .filter_map(level_definition)
                .map(|level| (level.level, level))
                .collect();
            registry.insert_abstract(AbstractNumbering {
                id: id.to_string(),
                levels,
            });
        } else if is_wml(node, "num") {
            let (Some(num_id), Some(abstract_id)) =
                (attr(node, "numId"), wml_val(node, "abstractNumId"))
            else {
                continue;
            };
            let start_overrides: HashMap<u32, u32> = node
                .children()
                .filter(|n| is_wml(*n, "lvlOverride"))
                .filter_map(|o| {
                    let level = attr(o, "ilvl")?.parse().ok()?;
                    let start = wml_val(o, "startOverride")?.parse().ok()?;
                    Some((level, start))
                })
                .collect();
            registry.insert_instance(
                num_id,
                NumberingInstance {
                    abstract_id: abstract_id.to_string(),
                    start_overrides,
                },
            );
        }
    }
    Ok(registry)
}

fn level_definition(node: Node) -> Option<LevelDefinition> {
    Some(LevelDefinition {
        level: attr(node, "ilvl")?.parse().ok()?,
        format: wml_val(node, "numFmt").map(str::to_string),
        text: wml_val(node, "lvlText").map(str::to_string),
        start: wml_val(node, "start").and_then(|v| v.parse().ok()),
        restart: wml_val(node, "lvlRestart").and_then(|v| v.parse().ok()),
        justification: wml_val(node, "lvlJc").map(str::to_string),
        suffix: wml_val(node, "suff").map(str::to_string),
        legal: wml_bool(node, "isLgl").unwrap_or(false),
        picture_bullet_id: wml_val(node, "lvlPicBulletId").map(str::to_string),
        run_properties: wml(node, "rPr").map(run_properties),
    })
}
