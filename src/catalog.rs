//! Merged tool catalog attached to a generation call.

use log::debug;

use crate::gateway::{FunctionDefinition, Tool};
use crate::mcp::ToolDescriptor;
use crate::service::Service;

/// A discovered tool together with the service whose session exposed it.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub service: Service,
    pub tool: ToolDescriptor,
}

/// Mapping from tool name to definition, accumulated service by service.
///
/// Insertion order follows service iteration order. Inserting a name that
/// already exists overwrites the entry in place, so later services win on
/// collision while the original position is kept.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    entries: Vec<CatalogEntry>,
}

impl ToolCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service: Service, tool: ToolDescriptor) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.tool.name == tool.name) {
            debug!(
                "Tool '{}' from {} overwrites earlier definition from {}",
                tool.name, service, existing.service
            );
            *existing = CatalogEntry { service, tool };
        } else {
            self.entries.push(CatalogEntry { service, tool });
        }
    }

    pub fn extend(&mut self, service: Service, tools: impl IntoIterator<Item = ToolDescriptor>) {
        for tool in tools {
            self.insert(service, tool);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.tool.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Tool definitions in the shape the gateway's chat API expects.
    #[must_use]
    pub fn gateway_tools(&self) -> Vec<Tool> {
        self.entries
            .iter()
            .map(|entry| Tool {
                tool_type: "function".to_string(),
                function: FunctionDefinition {
                    name: entry.tool.name.clone(),
                    description: entry.tool.description.clone(),
                    parameters: entry.tool.input_schema.clone(),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(name: &str, description: &str) -> ToolDescriptor {
        ToolDescriptor {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: json!({ "type": "object", "properties": {} }),
        }
    }

    #[test]
    fn merge_is_the_union_of_both_services() {
        let mut catalog = ToolCatalog::new();
        catalog.extend(Service::Image, [descriptor("image_create_image", "create")]);
        catalog.extend(Service::Search, [descriptor("search_search", "search")]);

        assert_eq!(catalog.len(), 2);
        assert!(catalog.get("image_create_image").is_some());
        assert!(catalog.get("search_search").is_some());
    }

    #[test]
    fn later_service_wins_on_name_collision() {
        let mut catalog = ToolCatalog::new();
        catalog.extend(Service::Image, [descriptor("shared", "from image")]);
        catalog.extend(Service::Search, [descriptor("shared", "from search")]);

        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("shared").expect("entry expected");
        assert_eq!(entry.service, Service::Search);
        assert_eq!(entry.tool.description, "from search");
    }

    #[test]
    fn overwrite_keeps_the_original_position() {
        let mut catalog = ToolCatalog::new();
        catalog.extend(
            Service::Image,
            [descriptor("shared", "v1"), descriptor("image_only", "i")],
        );
        catalog.extend(Service::Search, [descriptor("shared", "v2")]);

        let names: Vec<_> = catalog.iter().map(|e| e.tool.name.as_str()).collect();
        assert_eq!(names, ["shared", "image_only"]);
    }

    #[test]
    fn gateway_tools_project_name_description_and_schema() {
        let mut catalog = ToolCatalog::new();
        let schema = json!({
            "type": "object",
            "properties": { "query": { "type": "string" } },
            "required": ["query"]
        });
        catalog.insert(
            Service::Search,
            ToolDescriptor {
                name: "search_search".to_string(),
                description: "search".to_string(),
                input_schema: schema.clone(),
            },
        );

        let tools = catalog.gateway_tools();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].tool_type, "function");
        assert_eq!(tools[0].function.name, "search_search");
        assert_eq!(tools[0].function.parameters, schema);
    }
}
