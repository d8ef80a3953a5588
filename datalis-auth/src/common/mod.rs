mod models;

pub use models::{AuthChangeEvent, AuthStateChange, Session, User, REFRESH_MARGIN};
