//! Environment variables handed to the spawned application.

use crate::options::SpawnOptions;
use std::collections::HashMap;

impl SpawnOptions {
    /// Environment variables that tell the application which environment it runs in.
    ///
    /// Rails applications get `RAILS_ENV`, Rack applications `RACK_ENV`.
    /// WSGI applications get nothing.
    pub fn app_env(&self) -> HashMap<String, String> {
        self.app_type
            .environment_variable()
            .map(|key| (key.to_string(), self.environment.clone()))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::app_type::AppType;
    use crate::options::SpawnOptions;

    #[test]
    fn test_rails_env() {
        let options = SpawnOptions::builder("/srv/app")
            .environment("staging")
            .build()
            .unwrap();
        let env = options.app_env();

        assert_eq!(env.get("RAILS_ENV"), Some(&"staging".to_string()));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_rack_env() {
        let options = SpawnOptions::builder("/srv/app")
            .app_type(AppType::Rack)
            .build()
            .unwrap();
        let env = options.app_env();

        assert_eq!(env.get("RACK_ENV"), Some(&"production".to_string()));
        assert!(!env.contains_key("RAILS_ENV"));
    }

    #[test]
    fn test_wsgi_env_empty() {
        let options = SpawnOptions::builder("/srv/app")
            .app_type(AppType::Wsgi)
            .build()
            .unwrap();
        assert!(options.app_env().is_empty());
    }
}
