//! # Layer & Color Styles
//!
//! Drawing-layer assignments for emitted primitives. The host CAD document
//! owns actual layers and colors; the core only tags each primitive with a
//! layer name taken from an injected [`StyleMap`]. A default table covering
//! every assembly kind ships with the crate, but nothing here is global
//! mutable state - callers pass the map they want.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// AutoCAD Color Index values for the named colors the default table uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AciColor {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
    White,
    Orange,
    Teal,
    Black,
    ByBlock,
    ByLayer,
}

impl AciColor {
    /// Numeric ACI value.
    pub fn index(&self) -> u16 {
        match self {
            AciColor::ByBlock => 0,
            AciColor::Red => 1,
            AciColor::Yellow => 2,
            AciColor::Green => 3,
            AciColor::Cyan => 4,
            AciColor::Blue => 5,
            AciColor::Magenta => 6,
            AciColor::White => 7,
            AciColor::Orange => 30,
            AciColor::Teal => 130,
            AciColor::Black => 250,
            AciColor::ByLayer => 256,
        }
    }
}

/// Layer name plus color for one assembly kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub layer: String,
    pub color: AciColor,
}

impl LayerStyle {
    pub fn new(layer: impl Into<String>, color: AciColor) -> Self {
        LayerStyle {
            layer: layer.into(),
            color,
        }
    }
}

/// Assembly-kind -> style mapping, injected into every driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleMap {
    entries: HashMap<String, LayerStyle>,
}

static DEFAULT_STYLES: Lazy<StyleMap> = Lazy::new(|| {
    let mut entries = HashMap::new();
    let mut add = |kind: &str, layer: &str, color: AciColor| {
        entries.insert(kind.to_string(), LayerStyle::new(layer, color));
    };
    add("rack-frame", "3D-Rack-Frame", AciColor::Teal);
    add("rack-column", "3D-Rack-Column", AciColor::Teal);
    add("rack-beam", "3D-Rack-Beam", AciColor::Blue);
    add("rack-spacer", "3D-Rack-Spacer", AciColor::Black);
    add("mezz-column", "3D-Mezz-Column", AciColor::Black);
    add("mezz-beam", "3D-Mezz-Beam", AciColor::Blue);
    add("mezz-truss", "3D-Mezz-Truss", AciColor::Black);
    add("mezz-rail", "3D-Mezz-Rail", AciColor::Yellow);
    add("mezz-stair", "3D-Mezz-Stair", AciColor::Orange);
    add("mezz-ladder", "3D-Mezz-Ladder", AciColor::Orange);
    StyleMap { entries }
});

impl Default for StyleMap {
    fn default() -> Self {
        DEFAULT_STYLES.clone()
    }
}

impl StyleMap {
    /// Style for an assembly kind. Unknown kinds fall back to layer "0",
    /// color ByBlock - the host's catch-all layer.
    pub fn get(&self, kind: &str) -> LayerStyle {
        self.entries
            .get(kind)
            .cloned()
            .unwrap_or_else(|| LayerStyle::new("0", AciColor::ByBlock))
    }

    /// Layer name only (the part drivers stamp on primitives).
    pub fn layer(&self, kind: &str) -> String {
        self.get(kind).layer
    }

    /// Override or add a style.
    pub fn set(&mut self, kind: impl Into<String>, style: LayerStyle) {
        self.entries.insert(kind.into(), style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_covers_assemblies() {
        let styles = StyleMap::default();
        assert_eq!(styles.layer("rack-frame"), "3D-Rack-Frame");
        assert_eq!(styles.get("mezz-rail").color, AciColor::Yellow);
    }

    #[test]
    fn test_unknown_kind_falls_back() {
        let styles = StyleMap::default();
        let s = styles.get("no-such-kind");
        assert_eq!(s.layer, "0");
        assert_eq!(s.color, AciColor::ByBlock);
    }

    #[test]
    fn test_override() {
        let mut styles = StyleMap::default();
        styles.set("rack-frame", LayerStyle::new("Custom", AciColor::Red));
        assert_eq!(styles.layer("rack-frame"), "Custom");
    }

    #[test]
    fn test_aci_indices() {
        assert_eq!(AciColor::ByBlock.index(), 0);
        assert_eq!(AciColor::Orange.index(), 30);
        assert_eq!(AciColor::ByLayer.index(), 256);
    }
}
