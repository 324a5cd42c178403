//! # Hlavi DnD
//!
//! Drag-and-drop controller for Hlavi kanban boards.
//!
//! Cards are moved optimistically on the rendered board while the pointer
//! hovers over a column, and every drop is turned into a single
//! [`MutationRequest`] carrying the resulting order of both columns. The
//! board's state owner decides whether the move sticks; this crate never
//! rolls anything back itself.
//!
//! The rendered board is reached through the [`BoardDom`] trait.
//! [`MemoryBoard`] implements it in memory, and the `web` feature adds a
//! browser implementation on top of `web-sys`.

pub mod dnd;
pub mod domain;
pub mod error;
pub mod host;

// Re-export commonly used types
pub use dnd::{
    BoardEvent, ChannelSink, DragSession, EventOutcome, KanbanDnd, MutationSink, RecordingSink,
    TransferData,
};
pub use domain::{BoundingBox, ColumnId, DndConfig, MutationRequest, TicketId};
pub use error::{DndError, Result};
pub use host::{memory::MemoryBoard, BoardDom};
