use crate::domain::{ColumnId, TicketId};

/// The card currently being dragged and the column it was picked up from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub ticket_id: TicketId,
    pub from_column: ColumnId,
}

/// Holder of the single in-flight drag.
///
/// At most one session exists; starting a new one replaces any previous
/// session whose drag-end was never delivered.
#[derive(Debug, Default)]
pub struct SessionSlot {
    current: Option<DragSession>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, ticket_id: TicketId, from_column: ColumnId) -> &DragSession {
        if let Some(stale) = &self.current {
            tracing::debug!(ticket_id = %stale.ticket_id, "replacing drag session without drag-end");
        }
        self.current.insert(DragSession {
            ticket_id,
            from_column,
        })
    }

    pub fn end(&mut self) -> Option<DragSession> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&DragSession> {
        self.current.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }
}
