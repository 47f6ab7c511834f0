pub mod cleanup;
pub mod memory;
pub mod postgres;

pub use cleanup::spawn_cleanup_scheduler;
pub use memory::InMemorySessionStore;
pub use postgres::PostgresSessionStore;
