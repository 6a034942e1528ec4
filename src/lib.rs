pub mod channel;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod items;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod remote;
pub mod session;
pub mod snapshot;
pub mod store;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
