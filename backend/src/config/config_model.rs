use crates::domain::value_objects::plans::PlanCatalog;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub auth: Auth,
    pub plans: PlanCatalog,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB
    pub body_limit: u64,
    /// Seconds
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

/// Bearer tokens are issued by the external identity provider and signed with HS256.
#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
    pub audiences: Vec<String>,
}
