pub mod error;
pub mod slides;

pub use error::GlanceError;
pub use slides::{SlideShow, SlideShowGenerator};
