pub mod guard;

pub use guard::{is_protected, require_session, PROTECTED_PATH};
