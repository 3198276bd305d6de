mod segment;
mod store;

pub use segment::{Segment, SegmentKind};
pub use store::RoutineStore;
