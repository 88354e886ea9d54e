//! Static template catalog.
//!
//! Templates are configuration data, not mutable state: the catalog is a
//! fixed in-code table and the store never writes to it. The selection
//! cursor refers to entries by their stable string id.

use serde::Serialize;

/// Structured view backing a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Roadmap,
    Calendar,
}

/// A static, non-page structured view offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Template {
    /// Stable catalog id.
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
}

const TEMPLATES: [Template; 2] = [
    Template {
        id: "template-roadmap",
        name: "Roadmap",
        icon: "🗺️",
        description: "Plan and track project milestones",
        kind: TemplateKind::Roadmap,
    },
    Template {
        id: "template-calendar",
        name: "Calendar",
        icon: "📅",
        description: "Organize events and deadlines",
        kind: TemplateKind::Calendar,
    },
];

/// Returns the full template catalog in sidebar order.
pub fn catalog() -> &'static [Template] {
    &TEMPLATES
}

/// Looks up a template by its stable id.
pub fn find(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|template| template.id == id)
}

#[cfg(test)]
mod tests {
    use super::{catalog, find, TemplateKind};

    #[test]
    fn catalog_lists_roadmap_then_calendar() {
        let templates = catalog();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].kind, TemplateKind::Roadmap);
        assert_eq!(templates[1].kind, TemplateKind::Calendar);
    }

    #[test]
    fn find_resolves_known_ids_only() {
        assert_eq!(find("template-roadmap").map(|t| t.name), Some("Roadmap"));
        assert!(find("template-unknown").is_none());
    }
}
