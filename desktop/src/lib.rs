//! Desktop-side client for the siesta API: token persistence in the system
//! keychain and a transparent refresh-and-retry wrapper around protected
//! calls. No UI lives here.

pub mod api;
pub mod error;
pub mod session;
pub mod types;

pub use api::ApiClient;
pub use error::Error;
pub use session::{KeyringStore, MemoryStore, SessionStore};
