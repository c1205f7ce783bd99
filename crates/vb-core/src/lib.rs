pub mod config;
pub mod error;
pub mod geometry;
pub mod hit;
pub mod id;
pub mod model;
pub mod selection;
pub mod store;
pub mod viewport;

pub use config::EditorConfig;
pub use error::{EditorError, EditorResult};
pub use geometry::{ResizeHandle, ViewTransform};
pub use hit::{HandleHit, HandleMetrics, hit_test, hit_test_all, hit_test_handles};
pub use id::ElementId;
pub use model::*;
pub use selection::Selection;
pub use store::{EditSource, ElementStore};
pub use viewport::{ViewportController, ViewportState};

// Re-export kurbo types so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Size, Vec2};
