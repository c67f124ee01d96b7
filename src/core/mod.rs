pub mod errors;
pub mod logging;

pub use errors::FetchError;
pub use logging::init_logging;
