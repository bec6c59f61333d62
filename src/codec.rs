//! Flat label/value encoding of spawn options.
//!
//! An encoded record is twenty tokens: `label, value, label, value, ...` in
//! the order of [`Field::ALL`]. It can be embedded anywhere in a larger
//! sequence, e.g. after a command token:
//!
//! ```rust
//! use spawn_options::SpawnOptions;
//!
//! let options = SpawnOptions::new("/srv/blog");
//! let mut message = vec!["spawn_application".to_string()];
//! options.append_to(&mut message);
//!
//! let copy = SpawnOptions::from_tokens(&message, 1).unwrap();
//! assert_eq!(copy, options);
//! ```

use crate::error::DecodeError;
use crate::options::SpawnOptions;
use crate::schema::{Field, TOKEN_COUNT};
use std::collections::HashSet;

impl SpawnOptions {
    /// Append this record's label/value pairs to `tokens`.
    ///
    /// The resulting sequence can be sent to a spawner as-is. A non-UTF-8
    /// application root is rendered lossily; `validate()` rejects such roots.
    pub fn append_to(&self, tokens: &mut Vec<String>) {
        tokens.reserve(TOKEN_COUNT);
        for field in Field::ALL {
            tokens.push(field.label().to_string());
            tokens.push(field.encode(self));
        }
    }

    /// Encode this record into a fresh token vector.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(TOKEN_COUNT);
        self.append_to(&mut tokens);
        tokens
    }

    /// Decode a record written by [`append_to`](Self::append_to).
    ///
    /// The record starts at `offset`; field *n* has its label at
    /// `offset + 2n` and its value right after it. Tokens past the record are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - `Truncated` if fewer than twenty tokens follow `offset`
    /// - `LabelMismatch` if a label slot holds the wrong label
    /// - `InvalidValue` if a value does not parse for its field
    pub fn from_tokens<S: AsRef<str>>(
        tokens: &[S],
        offset: usize,
    ) -> Result<Self, DecodeError> {
        let record = offset
            .checked_add(TOKEN_COUNT)
            .and_then(|end| tokens.get(offset..end))
            .ok_or(DecodeError::Truncated {
                offset,
                needed: TOKEN_COUNT,
                available: tokens.len(),
            })?;

        let mut options = SpawnOptions::default();

        let pairs = Field::ALL.into_iter().zip(record.chunks_exact(2));
        for (i, (field, pair)) in pairs.enumerate() {
            let label = pair[0].as_ref();
            if label != field.label() {
                tracing::debug!(
                    index = offset + 2 * i,
                    expected = field.label(),
                    got = label,
                    "Spawn options label mismatch"
                );
                return Err(DecodeError::LabelMismatch {
                    index: offset + 2 * i,
                    expected: field.label(),
                    got: label.to_string(),
                });
            }

            field.decode_into(&mut options, pair[1].as_ref())?;
        }

        Ok(options)
    }

    /// Decode a record from label/value pairs in any order.
    ///
    /// Fields that are absent keep their defaults. Unknown labels are skipped
    /// so newer senders can add fields.
    ///
    /// # Errors
    ///
    /// - `DanglingLabel` if the sequence has an odd number of tokens
    /// - `DuplicateField` if a known label appears twice
    /// - `InvalidValue` if a value does not parse for its field
    pub fn from_key_values<S: AsRef<str>>(tokens: &[S]) -> Result<Self, DecodeError> {
        let pairs = tokens.chunks_exact(2);
        if let [label] = pairs.remainder() {
            return Err(DecodeError::DanglingLabel {
                label: label.as_ref().to_string(),
            });
        }

        let mut options = SpawnOptions::default();
        let mut seen = HashSet::new();

        for pair in pairs {
            let label = pair[0].as_ref();
            let Some(field) = Field::from_label(label) else {
                tracing::debug!(label, "Skipping unknown spawn option");
                continue;
            };

            if !seen.insert(field) {
                return Err(DecodeError::DuplicateField {
                    field: field.label(),
                });
            }

            field.decode_into(&mut options, pair[1].as_ref())?;
        }

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_type::AppType;
    use crate::spawn_method::SpawnMethod;
    use crate::timeout::IdleTimeout;

    fn sample() -> SpawnOptions {
        SpawnOptions::builder("/var/www/shop")
            .lower_privilege(false)
            .lowest_user("www-data")
            .environment("staging")
            .spawn_method(SpawnMethod::Conservative)
            .app_type(AppType::Wsgi)
            .framework_spawner_timeout(IdleTimeout::Never)
            .app_spawner_timeout(IdleTimeout::from_secs(90))
            .max_requests(250)
            .memory_limit(128)
            .build()
            .unwrap()
    }

    #[test]
    fn test_encoding_layout() {
        let tokens = sample().to_tokens();
        assert_eq!(
            tokens,
            vec![
                "app_root",
                "/var/www/shop",
                "lower_privilege",
                "false",
                "lowest_user",
                "www-data",
                "environment",
                "staging",
                "spawn_method",
                "conservative",
                "app_type",
                "wsgi",
                "framework_spawner_timeout",
                "0",
                "app_spawner_timeout",
                "90",
                "max_requests",
                "250",
                "memory_limit",
                "128",
            ]
        );
    }

    #[test]
    fn test_append_keeps_existing_tokens() {
        let mut tokens = vec!["my".to_string(), "data".to_string()];
        sample().append_to(&mut tokens);

        assert_eq!(tokens.len(), 2 + TOKEN_COUNT);
        assert_eq!(&tokens[..2], &["my", "data"]);
        assert_eq!(tokens[2], "app_root");
    }

    #[test]
    fn test_round_trip() {
        let options = sample();
        assert_eq!(SpawnOptions::from_tokens(&options.to_tokens(), 0), Ok(options));
    }

    #[test]
    fn test_default_round_trip_keeps_sentinels() {
        let options = SpawnOptions::new("app");
        let tokens = options.to_tokens();
        assert_eq!(tokens[13], "-1");
        assert_eq!(tokens[15], "-1");

        let decoded = SpawnOptions::from_tokens(&tokens, 0).unwrap();
        assert_eq!(decoded.framework_spawner_timeout, IdleTimeout::Default);
        assert_eq!(decoded.app_spawner_timeout, IdleTimeout::Default);
    }

    #[test]
    fn test_second_record_at_offset() {
        let first = SpawnOptions::new("/srv/one");
        let second = sample();

        let mut tokens = Vec::new();
        first.append_to(&mut tokens);
        second.append_to(&mut tokens);

        assert_eq!(SpawnOptions::from_tokens(&tokens, 0), Ok(first));
        assert_eq!(SpawnOptions::from_tokens(&tokens, TOKEN_COUNT), Ok(second));
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let mut tokens = sample().to_tokens();
        tokens.push("extra".to_string());
        assert_eq!(SpawnOptions::from_tokens(&tokens, 0), Ok(sample()));
    }

    #[test]
    fn test_accepts_str_slices() {
        let owned = sample().to_tokens();
        let borrowed: Vec<&str> = owned.iter().map(String::as_str).collect();
        assert_eq!(SpawnOptions::from_tokens(&borrowed, 0), Ok(sample()));
    }

    #[test]
    fn test_short_sequence_truncated() {
        let tokens = sample().to_tokens();
        assert_eq!(
            SpawnOptions::from_tokens(&tokens[..19], 0),
            Err(DecodeError::Truncated {
                offset: 0,
                needed: TOKEN_COUNT,
                available: 19
            })
        );
        assert!(matches!(
            SpawnOptions::from_tokens(&tokens, 1),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_offset_overflow_truncated() {
        let tokens = sample().to_tokens();
        assert!(matches!(
            SpawnOptions::from_tokens(&tokens, usize::MAX),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_label_mismatch_reports_position() {
        let mut tokens = sample().to_tokens();
        tokens[6] = "user".to_string();

        assert_eq!(
            SpawnOptions::from_tokens(&tokens, 0),
            Err(DecodeError::LabelMismatch {
                index: 6,
                expected: "environment",
                got: "user".to_string(),
            })
        );
    }

    #[test]
    fn test_label_mismatch_index_is_absolute() {
        let mut tokens = vec!["command".to_string()];
        sample().append_to(&mut tokens);
        tokens[1] = "root".to_string();

        assert!(matches!(
            SpawnOptions::from_tokens(&tokens, 1),
            Err(DecodeError::LabelMismatch { index: 1, expected: "app_root", .. })
        ));
    }

    #[test]
    fn test_invalid_value_names_field() {
        let mut tokens = sample().to_tokens();
        tokens[17] = "lots".to_string();

        let err = SpawnOptions::from_tokens(&tokens, 0).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidValue { field: "max_requests", ref value, .. } if value == "lots"
        ));
    }

    #[test]
    fn test_key_values_any_order() {
        let tokens = [
            "memory_limit",
            "64",
            "app_type",
            "rack",
            "app_root",
            "/srv/api",
        ];
        let options = SpawnOptions::from_key_values(&tokens).unwrap();

        assert_eq!(options.app_root, std::path::PathBuf::from("/srv/api"));
        assert_eq!(options.app_type, AppType::Rack);
        assert_eq!(options.limits.memory_limit, 64);
        // Everything else defaulted
        assert_eq!(options.environment, "production");
        assert!(options.lower_privilege);
    }

    #[test]
    fn test_key_values_skips_unknown() {
        let tokens = ["app_root", "/srv/api", "gem_home", "/opt/gems"];
        let options = SpawnOptions::from_key_values(&tokens).unwrap();
        assert_eq!(options, SpawnOptions::new("/srv/api"));
    }

    #[test]
    fn test_key_values_rejects_duplicates() {
        let tokens = ["environment", "staging", "environment", "production"];
        assert_eq!(
            SpawnOptions::from_key_values(&tokens),
            Err(DecodeError::DuplicateField {
                field: "environment"
            })
        );
    }

    #[test]
    fn test_key_values_rejects_dangling_label() {
        let tokens = ["app_root", "/srv/api", "environment"];
        assert_eq!(
            SpawnOptions::from_key_values(&tokens),
            Err(DecodeError::DanglingLabel {
                label: "environment".to_string()
            })
        );
    }

    #[test]
    fn test_key_values_reads_positional_encoding() {
        let options = sample();
        assert_eq!(SpawnOptions::from_key_values(&options.to_tokens()), Ok(options));
    }
}
