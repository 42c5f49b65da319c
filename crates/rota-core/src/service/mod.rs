//! Service layer: orchestration over the domain engines and the driven
//! ports.

pub mod event_router;
pub mod rotation_job;
pub mod table_store;

pub use event_router::EventRouter;
pub use rotation_job::DailyRotationJob;
pub use table_store::{
    TableStore, CHAT_AUTH_TOKEN_SLOT, MEMBERSHIP_SLOT, REQUEST_SIGNING_SECRET_SLOT,
    ROTATION_POINTER_SLOT,
};
