use serde::{Deserialize, Serialize};

/// Configuration for the doctors_info module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoctorsInfoConfig {
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    #[serde(default = "default_check_email_on_update")]
    pub check_email_on_update: bool,
}

impl Default for DoctorsInfoConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            check_email_on_update: default_check_email_on_update(),
        }
    }
}

fn default_route_prefix() -> String {
    "/api/doctors".to_string()
}

fn default_check_email_on_update() -> bool {
    true
}
