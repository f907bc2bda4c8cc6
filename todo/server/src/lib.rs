pub mod config {
    use serde::Deserialize;
    use std::path::PathBuf;

    /// Server configuration read from environment variables.
    ///
    /// `DATABASE_URL` wins when set; otherwise the connection string is assembled
    /// from the discrete `PG*` variables.
    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        #[serde(default)]
        pub database_url: Option<String>,
        #[serde(default = "default_pghost")]
        pub pghost: String,
        #[serde(default = "default_pgport")]
        pub pgport: u16,
        #[serde(default = "default_pguser")]
        pub pguser: String,
        #[serde(default = "default_pgpassword")]
        pub pgpassword: String,
        #[serde(default = "default_pgdatabase")]
        pub pgdatabase: String,
        #[serde(default = "default_port")]
        pub port: u16,
        #[serde(default = "default_static_dir")]
        pub static_dir: PathBuf,
        #[serde(default = "default_db_max_connections")]
        pub db_max_connections: u32,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            Self::load(config::Environment::default())
        }

        /// Loads configuration from the given environment source.
        pub fn load(environment: config::Environment) -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(environment)
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }

        /// Returns the connection string for the todo store.
        pub fn database_url(&self) -> String {
            match self.database_url.as_deref().filter(|url| !url.is_empty()) {
                Some(url) => url.to_string(),
                None => format!(
                    "postgres://{}:{}@{}:{}/{}",
                    urlencoding::encode(&self.pguser),
                    urlencoding::encode(&self.pgpassword),
                    self.pghost,
                    self.pgport,
                    urlencoding::encode(&self.pgdatabase),
                ),
            }
        }
    }

    fn default_pghost() -> String {
        "localhost".to_string()
    }

    fn default_pgport() -> u16 {
        5432
    }

    fn default_pguser() -> String {
        "postgres".to_string()
    }

    fn default_pgpassword() -> String {
        "postgres".to_string()
    }

    fn default_pgdatabase() -> String {
        "todos".to_string()
    }

    fn default_port() -> u16 {
        3000
    }

    fn default_static_dir() -> PathBuf {
        PathBuf::from("public")
    }

    fn default_db_max_connections() -> u32 {
        10
    }

}
pub mod entities;
pub mod todo;
pub mod web;
