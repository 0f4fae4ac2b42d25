use crate::types::HealthRes;

/// Simple health service used by the REST API.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Static health check; used by monitoring and load balancers.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "FileVault is alive".into(),
        }
    }
}
