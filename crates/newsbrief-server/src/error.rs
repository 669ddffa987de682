use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration. Please set the {env_var} environment variable")]
    MissingEnvVar { env_var: String },

    #[error(transparent)]
    Other(#[from] config::ConfigError),
}

/// Map a dotted settings path back to the environment variable that supplies
/// it, e.g. `platform.api_key` -> `NEWSBRIEF_PLATFORM__API_KEY`.
pub fn to_env_var(field: &str) -> String {
    format!("NEWSBRIEF_{}", field.replace('.', "__").to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_env_var() {
        assert_eq!(to_env_var("platform.api_key"), "NEWSBRIEF_PLATFORM__API_KEY");
        assert_eq!(to_env_var("port"), "NEWSBRIEF_PORT");
    }
}
