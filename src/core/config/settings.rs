use super::parsing::{env_flag, env_optional, env_or_default, env_parse, environment_from};
use super::types::{
    ApiSettings, ConfigError, DatabaseSettings, MaintenanceSettings, RuntimeSettings, ServerHost,
    ServerPort, ServerSettings, Settings, SweepSettings, TelemetrySettings,
};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        let host = env_or_default("QUIZ_SWEEP_HOST", "0.0.0.0");
        let port = env_or_default("QUIZ_SWEEP_PORT", "8000");

        let environment = environment_from(
            env_optional("QUIZ_SWEEP_ENV").or_else(|| env_optional("ENVIRONMENT")).as_deref(),
        );
        let strict_config =
            env_flag("QUIZ_SWEEP_STRICT_CONFIG", false) || environment.is_production();

        let project_name = env_or_default("PROJECT_NAME", "Quiz Sweep");
        let version = env_or_default("VERSION", env!("CARGO_PKG_VERSION"));
        let api_v1_str = env_or_default("API_V1_STR", "/api/v1");

        let postgres_server = env_or_default("POSTGRES_SERVER", "localhost");
        let postgres_port = env_parse("POSTGRES_PORT", 5432u16)?;
        let postgres_user = env_or_default("POSTGRES_USER", "quizsweep");
        let postgres_password = env_or_default("POSTGRES_PASSWORD", "");
        let postgres_db = env_or_default("POSTGRES_DB", "quiz_db");
        let database_url = env_optional("DATABASE_URL");
        let max_connections = env_parse("DB_MAX_CONNECTIONS", 10u32)?;

        let sweep_enabled = env_flag("SWEEP_ENABLED", true);
        let sweep_interval_seconds = env_parse("SWEEP_INTERVAL_SECONDS", 60u64)?;
        let grace_period_min_seconds = env_parse("QUIZ_GRACE_PERIOD_MIN_SECONDS", 60u64)?;

        let maintenance_token = env_optional("MAINTENANCE_TOKEN");

        let log_level = env_or_default("QUIZ_SWEEP_LOG_LEVEL", "info");
        let json = env_flag("QUIZ_SWEEP_LOG_JSON", false);
        let prometheus_enabled = env_flag("PROMETHEUS_ENABLED", false);

        let settings = Self {
            server: ServerSettings {
                host: ServerHost::parse(host)?,
                port: ServerPort::parse(port)?,
            },
            runtime: RuntimeSettings { environment, strict_config },
            api: ApiSettings { project_name, version, api_v1_str },
            database: DatabaseSettings {
                postgres_server,
                postgres_port,
                postgres_user,
                postgres_password,
                postgres_db,
                database_url,
                max_connections,
            },
            sweep: SweepSettings {
                enabled: sweep_enabled,
                interval_seconds: sweep_interval_seconds,
                grace_period_min_seconds,
            },
            maintenance: MaintenanceSettings { token: maintenance_token },
            telemetry: TelemetrySettings { log_level, json, prometheus_enabled },
        };

        settings.validate()?;
        Ok(settings)
    }

    pub(crate) fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host.0, self.server.port.0)
    }

    pub(crate) fn server_host(&self) -> &str {
        &self.server.host.0
    }

    pub(crate) fn server_port(&self) -> u16 {
        self.server.port.0
    }

    pub(crate) fn api(&self) -> &ApiSettings {
        &self.api
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn sweep(&self) -> &SweepSettings {
        &self.sweep
    }

    pub(crate) fn maintenance(&self) -> &MaintenanceSettings {
        &self.maintenance
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }

    pub(crate) fn runtime(&self) -> &RuntimeSettings {
        &self.runtime
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "SWEEP_INTERVAL_SECONDS",
                value: "0".to_string(),
            });
        }

        if self.database.max_connections < 2 {
            // The sweep cursor and the per-attempt transaction each hold a connection.
            return Err(ConfigError::InvalidValue {
                field: "DB_MAX_CONNECTIONS",
                value: self.database.max_connections.to_string(),
            });
        }

        if !(self.runtime.strict_config || self.runtime.environment.is_production()) {
            return Ok(());
        }

        if self.database.database_url.is_none() && self.database.postgres_password.is_empty() {
            return Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn load_uses_defaults() {
        let _guard = test_support::env_lock().await;
        test_support::clear_sweep_env();

        let settings = Settings::load().expect("settings");
        assert_eq!(settings.server_addr(), "0.0.0.0:8000");
        assert_eq!(settings.api().api_v1_str, "/api/v1");
        assert!(settings.sweep().enabled);
        assert_eq!(settings.sweep().interval_seconds, 60);
        assert_eq!(settings.sweep().grace_period_min_seconds, 60);
        assert!(settings.maintenance().token.is_none());
        assert!(!settings.telemetry().prometheus_enabled);
    }

    #[tokio::test]
    async fn load_rejects_zero_interval() {
        let _guard = test_support::env_lock().await;
        test_support::clear_sweep_env();
        std::env::set_var("SWEEP_INTERVAL_SECONDS", "0");

        let result = Settings::load();
        std::env::remove_var("SWEEP_INTERVAL_SECONDS");

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "SWEEP_INTERVAL_SECONDS", .. })
        ));
    }

    #[tokio::test]
    async fn strict_config_requires_database_password() {
        let _guard = test_support::env_lock().await;
        test_support::clear_sweep_env();
        std::env::set_var("QUIZ_SWEEP_ENV", "production");

        let result = Settings::load();
        std::env::remove_var("QUIZ_SWEEP_ENV");

        assert!(matches!(result, Err(ConfigError::MissingSecret("POSTGRES_PASSWORD"))));
    }
}
