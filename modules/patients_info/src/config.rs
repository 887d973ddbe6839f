use serde::{Deserialize, Serialize};

/// Configuration for the patients_info module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatientsInfoConfig {
    #[serde(default = "default_route_prefix")]
    pub route_prefix: String,
    #[serde(default = "default_check_email_on_update")]
    pub check_email_on_update: bool,
}

impl Default for PatientsInfoConfig {
    fn default() -> Self {
        Self {
            route_prefix: default_route_prefix(),
            check_email_on_update: default_check_email_on_update(),
        }
    }
}

fn default_route_prefix() -> String {
    "/api/patients".to_string()
}

fn default_check_email_on_update() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_keys_are_rejected() {
        let err = serde_json::from_value::<PatientsInfoConfig>(serde_json::json!({
            "route_prefix": "/p",
            "page_size": 10
        }));
        assert!(err.is_err());

        let cfg: PatientsInfoConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.route_prefix, "/api/patients");
        assert!(cfg.check_email_on_update);
    }
}
