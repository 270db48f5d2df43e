//! Static tool configuration.
//!
//! Every placeable element type is described once in the [`ToolCatalog`].
//! Descriptors are shared (`Arc`) between the catalog and every element the
//! store commits, so display name, asset and footprint are stored per type
//! rather than per element.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifier of a tool / element type (`"tree"`, `"road"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(String);

impl ToolId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ToolId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which semantic action a click with this tool produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolClass {
    /// One click places one fixed-footprint element.
    Point,
    /// Clicks accumulate vertices of a polyline.
    Path,
}

/// Read-only description of an element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub id: ToolId,
    pub class: ToolClass,
    /// Human-readable name.
    pub name: String,
    /// Icon URL for point tools, stroke color for path tools.
    pub data: String,
    /// Footprint width (point tools) or stroke thickness (path tools).
    pub width: f64,
    /// Footprint height (point tools) or stroke thickness (path tools).
    pub height: f64,
}

impl ToolDescriptor {
    /// Describe a point-class tool. Footprint dimensions must be positive.
    pub fn point(id: &str, name: &str, icon: &str, width: f64, height: f64) -> Self {
        debug_assert!(width > 0.0 && height > 0.0);
        Self {
            id: ToolId::new(id),
            class: ToolClass::Point,
            name: name.to_string(),
            data: icon.to_string(),
            width,
            height,
        }
    }

    /// Describe a path-class tool.
    pub fn path(id: &str, name: &str, color: &str, thickness: f64) -> Self {
        Self {
            id: ToolId::new(id),
            class: ToolClass::Path,
            name: name.to_string(),
            data: color.to_string(),
            width: thickness,
            height: thickness,
        }
    }
}

/// The set of tools known at startup, in toolbar order.
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: Vec<Arc<ToolDescriptor>>,
}

impl ToolCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// The stock map tools.
    pub fn standard() -> Self {
        const EMOJI_CDN: &str = "https://cdn.jsdelivr.net/npm/emoji-datasource-apple/img/apple/64";
        let mut catalog = Self::empty();
        catalog.insert(ToolDescriptor::point("tree", "Tree", &format!("{EMOJI_CDN}/1f332.png"), 40.0, 40.0));
        catalog.insert(ToolDescriptor::point(
            "building",
            "Building",
            &format!("{EMOJI_CDN}/1f3e2.png"),
            50.0,
            50.0,
        ));
        catalog.insert(ToolDescriptor::point("water", "Water", &format!("{EMOJI_CDN}/1f30a.png"), 48.0, 48.0));
        catalog.insert(ToolDescriptor::path("road", "Road", "#6b7280", 10.0));
        catalog.insert(ToolDescriptor::path("river", "River", "#3b82f6", 8.0));
        catalog
    }

    /// Add a tool, replacing any existing tool with the same id.
    pub fn insert(&mut self, descriptor: ToolDescriptor) {
        let descriptor = Arc::new(descriptor);
        match self.tools.iter_mut().find(|t| t.id == descriptor.id) {
            Some(slot) => *slot = descriptor,
            None => self.tools.push(descriptor),
        }
    }

    /// Look up a tool by id.
    pub fn get(&self, id: &ToolId) -> Option<&Arc<ToolDescriptor>> {
        self.tools.iter().find(|t| &t.id == id)
    }

    /// The class of a tool, if it exists.
    pub fn class_of(&self, id: &ToolId) -> Option<ToolClass> {
        self.get(id).map(|t| t.class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ToolDescriptor>> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
