pub mod context;
pub mod store;

pub use context::{AuthContext, AuthError, LoginOutcome};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
