pub mod cache;
pub mod db;
pub mod store;

pub use cache::StateCache;
pub use db::{create_pool, DbPool};
pub use store::UserStateStore;
