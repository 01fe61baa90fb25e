pub mod events;
pub mod health;

pub use events::{create_event, get_event, list_events, update_event};
pub use health::{health_check, root};
