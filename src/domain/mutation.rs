use crate::domain::ids::{ColumnId, TicketId};
use serde::{Deserialize, Serialize};

/// Proposed move of a ticket, handed to the board's state owner on drop.
///
/// Both ordered id lists are snapshots of the columns as they look after the
/// optimistic move, so the state owner can persist them as-is or reject them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRequest {
    pub ticket_id: TicketId,
    pub from_column: ColumnId,
    pub to_column: ColumnId,
    pub from_ordered_ids: Vec<TicketId>,
    pub to_ordered_ids: Vec<TicketId>,
}

impl MutationRequest {
    /// Whether the ticket stayed within its origin column
    pub fn is_reorder(&self) -> bool {
        self.from_column == self.to_column
    }

    /// Position of the ticket in the destination column, if present
    pub fn target_index(&self) -> Option<usize> {
        self.to_ordered_ids
            .iter()
            .position(|id| id == &self.ticket_id)
    }
}
