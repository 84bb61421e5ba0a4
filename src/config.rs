use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    /// False when `database_url` fell back to the default.
    pub database_url_set: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").ok();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            database_url_set: database_url.is_some(),
            database_url: database_url.unwrap_or_else(|| "poolbnb.db".to_string()),
        }
    }

    /// File name of the SQLite database, without directories.
    pub fn database_name(&self) -> &str {
        std::path::Path::new(&self.database_url)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.database_url)
    }
}
