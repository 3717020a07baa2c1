pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryCustomerRegistry;
pub use postgres::PostgresCustomerRegistry;
