//! Authentication types.

mod credentials;

pub use credentials::{AuthMethod, Credentials};
