//! Content services: validation, authorization and the side effects that
//! accompany each create (preview images, Open Graph, notification fan-out).

pub mod access;
pub mod announcements;
pub mod articles;
pub mod resources;
pub mod subscribers;

pub use access::{authorize, Caller};
pub use announcements::{notification_for, AnnouncementService, FanoutReport, Published};
pub use articles::{ArticleService, FALLBACK_PREVIEW_IMAGE};
pub use resources::ResourceService;
pub use subscribers::{SubscriberService, ALREADY_SUBSCRIBED};
