pub mod controller;
pub mod insertion;
pub mod ordering;
pub mod session;
pub mod sink;

pub use controller::{BoardEvent, EventOutcome, KanbanDnd, TransferData};
pub use insertion::{drag_after_element, insertion_point};
pub use ordering::ordered_ids;
pub use session::{DragSession, SessionSlot};
pub use sink::{ChannelSink, MutationSink, RecordingSink};
