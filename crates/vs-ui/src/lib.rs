//! # vs-ui
//!
//! The VentSpace component: submission pipeline, live feed synchronizer,
//! immutable view state, and the page template that renders it.

pub mod component;
pub mod feed;
pub mod page;
pub mod state;
pub mod submit;

pub use component::{VentSpace, SUCCESS_NOTICE_TTL};
pub use feed::{FeedSynchronizer, FeedUpdate, Subscription};
pub use page::VentSpaceTemplate;
pub use state::{FeedStatus, ViewEvent, ViewState, FAILURE_MESSAGE};
pub use submit::SubmissionPipeline;
