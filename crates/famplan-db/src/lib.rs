
pub mod connection;
pub use connection::Connection;

pub mod operations;
pub use operations::{Delete, Insert, Query, Retrieve, Update};

pub mod results;
pub mod schema;

pub mod members;
pub mod plan_cost;
