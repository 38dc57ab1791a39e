// Adapters layer: concrete implementations for external systems (databases, Supabase).

pub mod firebird;
pub mod mysql;
pub mod postgres;
pub mod supabase;

use crate::domain::model::Engine;
use crate::domain::ports::Connector;

pub use firebird::FirebirdConnector;
pub use mysql::MySqlConnector;
pub use postgres::PostgresConnector;
pub use supabase::SupabaseClient;

/// Default `ConnectorFactory`.
pub fn connector_for(engine: Engine) -> Box<dyn Connector> {
    match engine {
        Engine::MySql => Box::new(MySqlConnector),
        Engine::PostgreSql => Box::new(PostgresConnector),
        Engine::Firebird => Box::new(FirebirdConnector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_engine_gets_its_own_connector() {
        for engine in Engine::ALL {
            assert_eq!(connector_for(engine).engine(), engine);
        }
    }
}
