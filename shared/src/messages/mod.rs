//! Backend contract messages
//!
//! Request and response shapes exchanged with the REST collaborators.

pub mod registration;
pub mod search;

pub use registration::*;
pub use search::*;
