//! Library directory selection and preparation.
//!
//! The interpreter reports an ordered list of library search paths. One of
//! them becomes the install destination for this run: the first user-scoped
//! entry when there is one, otherwise the first entry as the system fallback.
//! Only a user-scoped selection is ever created or cleaned on disk.

pub mod clean;
pub mod paths;

pub use clean::prepare_user_library;
pub use paths::{select_library, LibraryScope, LibrarySelection};
