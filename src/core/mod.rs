//! Test Client Core Components
//!
//! Transport, browser session, protocol state and endpoint layout.

pub mod context;
pub mod endpoints;
pub mod pkce;
pub mod session;
pub mod state;
pub mod transport;

pub use context::*;
pub use endpoints::*;
pub use pkce::*;
pub use session::*;
pub use state::*;
pub use transport::*;
