//! HTTP surface for the shopping list service.
//!
//! Requests flow router -> dispatch -> repositories -> response envelope;
//! `server` owns the transport and worker pool around that pipeline.

pub mod config;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod server;

pub use config::{ConfigError, ServerConfig};
pub use dispatch::{dispatch, dispatch_sqlite, Repositories};
pub use response::{ApiError, HttpReply, Reply, CORS_HEADERS};
pub use router::{resolve, Route, RouteError, Target};
pub use server::{handle_request, ApiServer, ServerError, ServerHandle};
