pub mod config;
pub mod geometry;
pub mod ids;
pub mod mutation;

pub use config::DndConfig;
pub use geometry::BoundingBox;
pub use ids::{ColumnId, TicketId};
pub use mutation::MutationRequest;
