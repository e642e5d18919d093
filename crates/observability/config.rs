use std::env;
use tracing_subscriber::EnvFilter;

pub(crate) const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Clone, Debug)]
pub(crate) struct ServiceContext {
    pub(crate) service_name: String,
    pub(crate) environment: String,
    pub(crate) component: String,
}

#[derive(Clone, Debug)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    pub(crate) log_filter: String,
    /// Warnings captured during config parsing so they can be logged after tracing is initialized.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_lookup(component, |key| env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(component: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = lookup("SERVICE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = lookup("STAGE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let log_filter = match lookup("RUST_LOG").filter(|v| !v.trim().is_empty()) {
            Some(raw) => match EnvFilter::try_new(&raw) {
                Ok(_) => raw,
                Err(err) => {
                    warnings.push(format!(
                        "RUST_LOG is invalid (value: {raw}, error: {err}); defaulting to {DEFAULT_LOG_FILTER}"
                    ));
                    DEFAULT_LOG_FILTER.to_string()
                }
            },
            None => DEFAULT_LOG_FILTER.to_string(),
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            log_filter,
            warnings,
        }
    }
}
