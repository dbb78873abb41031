pub mod error;
pub mod history;
pub mod ops;
pub mod session;
pub mod timing;

pub use error::EditError;
pub use session::Session;
