//! # Project Data Structures
//!
//! The `Project` struct is the root container for a layout job. Projects
//! serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, designer, job info, timestamps)
//! ├── settings: GlobalSettings (units, drawing styles)
//! └── items: HashMap<Uuid, AssemblyItem> (all assemblies)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use mezz_core::project::Project;
//!
//! let mut project = Project::new("Jane Designer", "25-042", "ACME Corp");
//!
//! // Serialize to JSON
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assemblies::AssemblyItem;
use crate::styles::StyleMap;

/// Current schema version for project files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
///
/// Items are stored in a flat UUID-keyed map for O(1) lookups and stable
/// references when items are reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, designer, job info)
    pub meta: ProjectMetadata,

    /// Global settings (units, drawing styles)
    pub settings: GlobalSettings,

    /// All assemblies, keyed by UUID
    pub items: HashMap<Uuid, AssemblyItem>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `designer` - Name of the responsible designer
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(
        designer: impl Into<String>,
        job_id: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                designer: designer.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            items: HashMap::new(),
        }
    }

    /// Add an assembly to the project. Returns the UUID assigned to it.
    pub fn add_item(&mut self, item: AssemblyItem) -> Uuid {
        let id = Uuid::new_v4();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove an assembly by UUID. Returns the removed item if it existed.
    pub fn remove_item(&mut self, id: &Uuid) -> Option<AssemblyItem> {
        let item = self.items.remove(id);
        if item.is_some() {
            self.touch();
        }
        item
    }

    /// Get an assembly by UUID.
    pub fn get_item(&self, id: &Uuid) -> Option<&AssemblyItem> {
        self.items.get(id)
    }

    /// Get a mutable reference to an assembly by UUID.
    ///
    /// Getting a mutable reference marks the project as modified.
    pub fn get_item_mut(&mut self, id: &Uuid) -> Option<&mut AssemblyItem> {
        if self.items.contains_key(id) {
            self.meta.modified = Utc::now();
            self.items.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible designer
    pub designer: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Linear unit all dimensions are in (display only; the core is
    /// unit-agnostic)
    pub unit: LinearUnit,

    /// Layer and color assignments for emitted geometry
    pub styles: StyleMap,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            unit: LinearUnit::Inch,
            styles: StyleMap::default(),
        }
    }
}

/// Linear unit tag for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinearUnit {
    Inch,
    Millimeter,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemblies::{AssemblyItem, FrameInput};

    #[test]
    fn test_project_creation() {
        let project = Project::new("John Doe", "25-001", "Acme Corp");
        assert_eq!(project.meta.designer, "John Doe");
        assert_eq!(project.meta.job_id, "25-001");
        assert_eq!(project.meta.client, "Acme Corp");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Jane Designer", "25-042", "Test Client");
        project.add_item(AssemblyItem::Frame(FrameInput::default()));
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("Jane Designer"));
        assert!(json.contains("25-042"));
        assert!(json.contains("Frame"));

        // Roundtrip
        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.meta.designer, "Jane Designer");
        assert_eq!(roundtrip.item_count(), 1);
    }

    #[test]
    fn test_add_remove_item() {
        let mut project = Project::new("Designer", "25-001", "Client");

        let id = project.add_item(AssemblyItem::Frame(FrameInput::default()));
        assert_eq!(project.item_count(), 1);
        assert_eq!(project.get_item(&id).unwrap().kind(), "Frame");

        let removed = project.remove_item(&id);
        assert!(removed.is_some());
        assert_eq!(project.item_count(), 0);
    }

    #[test]
    fn test_styles_travel_with_project() {
        let project = Project::new("Designer", "25-001", "Client");
        assert_eq!(project.settings.styles.layer("rack-frame"), "3D-Rack-Frame");
    }
}
