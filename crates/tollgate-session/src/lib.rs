//! Per-user session management for Tollgate.
//!
//! Signed tokens are stateless: a signature stays valid until its
//! embedded expiry. This crate adds the state on top:
//!
//! 1. **Session records**: one [`SessionRecord`] per issued token,
//!    stored per user in a [`SessionStore`]
//! 2. **Admission**: the [`SessionManager`] caps how many live sessions
//!    a user may hold ([`SessionConfig`] / [`SessionPolicy`])
//! 3. **Liveness**: a token is only honored while its record is live;
//!    expired records are filtered on every read and pruned on the next
//!    admission
//!
//! # How it fits in the stack
//!
//! ```text
//! Auth Layer (above)  ← asks "may this token be issued / honored?"
//!     ↕  SessionRegistry
//! Session Layer (this crate)  ← per-user caps and expiry
//!     ↕  SessionStore
//! Storage (below)  ← opaque get/set of a user's session list
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod manager;
mod registry;
mod session;
mod store;

pub use error::{SessionError, StoreError};
pub use manager::SessionManager;
pub use registry::SessionRegistry;
pub use session::{
    DEFAULT_MAX_SESSIONS_PER_USER, SessionConfig, SessionPolicy, SessionRecord,
};
pub use store::{MemoryStore, SessionStore};
