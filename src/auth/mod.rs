mod authorize;
mod session;

pub use authorize::redirect_to_authorize;
pub use session::Session;
