use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{EVERYONE_ROLE, ROLE_NAME_PATTERN};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub access_control: AccessControlConfig,
    pub role_service: RoleServiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn serve_origin(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the server origin URL.
    #[must_use]
    pub fn origin(&self) -> String {
        if let Some(origin) = &self.serve_origin {
            origin.clone()
        } else {
            self.serve_origin()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Workspace-level publishing policy.
///
/// Both lists hold principal names (usernames or role names) and are evaluated
/// with the same membership test as publication access rules, so `EVERYONE`
/// opens the policy to anonymous actors as well.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessControlConfig {
    /// Who may create a new public workspace by publishing into it.
    pub grant_create_public_workspace: Vec<String>,
    /// Who may publish into an existing public workspace.
    pub grant_publish_in_public_workspace: Vec<String>,
}

/// Role service contract: which role names the platform reserves for itself
/// and which names are considered grantable at all.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleServiceConfig {
    /// The internal role the platform assigns to its own GeoServer user.
    pub internal_role: String,
    /// Allow-list pattern a role name must match to be surfaced.
    pub name_pattern: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8700)?
            .set_default("database.max_connections", 4)?
            .set_default("logging.level", "debug")?
            .set_default(
                "access_control.grant_create_public_workspace",
                vec![EVERYONE_ROLE],
            )?
            .set_default(
                "access_control.grant_publish_in_public_workspace",
                vec![EVERYONE_ROLE],
            )?
            .set_default("role_service.internal_role", "GEOPUB")?
            .set_default("role_service.name_pattern", ROLE_NAME_PATTERN)?
            // Env file
            .add_source(
                config::Environment::default()
                    .convert_case(config::Case::Snake)
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
