//! Authorization credentials, redacted secrets, and scope sets.

pub mod credentials;
pub mod scope;
pub mod secret;

pub use credentials::*;
pub use scope::*;
pub use secret::*;
