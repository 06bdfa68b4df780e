mod in_memory;
mod postgres;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
