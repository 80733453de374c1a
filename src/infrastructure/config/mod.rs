mod settings;

pub use settings::{DatabaseConfig, OtelConfig, ServerConfig, Settings, LOCAL_DATABASE_URL};
