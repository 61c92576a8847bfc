pub mod handler;
pub mod page;
pub mod routes;
pub mod session;

pub use crate::handler::{Payload, RequestHandler};
pub use crate::routes::{configure, AppState};
pub use crate::session::{MemorySessionStore, Session};
