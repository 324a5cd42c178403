use crate::error::{DndError, Result};
use serde::{Deserialize, Serialize};

/// Naming conventions shared with the board renderer.
///
/// The defaults match the markup produced by the Hlavi web board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DndConfig {
    /// DOM id prefix of card elements; the remainder is the ticket id
    pub card_id_prefix: String,
    /// Attribute carrying the ticket id on a card
    pub ticket_attr: String,
    /// Attribute carrying the column id on cards and dropzones
    pub column_attr: String,
    /// Attribute marking an element as a dropzone
    pub dropzone_attr: String,
    /// Class applied to the card while it is dragged
    pub dragging_class: String,
    /// Classes applied to a column while a card hovers over it
    pub highlight_classes: Vec<String>,
    /// Event name under which drop mutations are pushed
    pub drop_event: String,
}

impl Default for DndConfig {
    fn default() -> Self {
        Self {
            card_id_prefix: "kanban-ticket-".to_string(),
            ticket_attr: "data-ticket-id".to_string(),
            column_attr: "data-kanban-column".to_string(),
            dropzone_attr: "data-kanban-dropzone".to_string(),
            dragging_class: "opacity-60".to_string(),
            highlight_classes: vec!["ring-2".to_string(), "ring-primary/30".to_string()],
            drop_event: "kanban_drop".to_string(),
        }
    }
}

impl DndConfig {
    /// Parses a JSON config; missing fields fall back to defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DndConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every naming convention is usable
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("card_id_prefix", &self.card_id_prefix),
            ("ticket_attr", &self.ticket_attr),
            ("column_attr", &self.column_attr),
            ("dropzone_attr", &self.dropzone_attr),
            ("dragging_class", &self.dragging_class),
            ("drop_event", &self.drop_event),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DndError::ConfigError(format!("{} must not be empty", field)));
            }
        }

        if self.highlight_classes.iter().any(|c| c.trim().is_empty()) {
            return Err(DndError::ConfigError(
                "highlight_classes must not contain empty class names".to_string(),
            ));
        }

        Ok(())
    }
}
