mod error;
mod shutdown;

pub mod prelude {
    pub use crate::error::ConfigurationError;
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
}
