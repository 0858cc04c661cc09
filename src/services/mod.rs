pub mod candidates;
pub mod drawer;
pub mod picker;

pub use candidates::CandidateSource;
pub use drawer::{DrawError, DrawStrategy, WeightedDrawer};
pub use picker::pick_next;
