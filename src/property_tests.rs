//! Property-based tests for the spawn options wire form.
//!
//! These tests verify invariants of encoding and decoding:
//! - Any record survives an encode/decode round trip unchanged
//! - Records survive being embedded after arbitrary leading tokens
//! - Keyed decoding agrees with positional decoding
//! - Framed token arrays decode to the same tokens

use std::num::NonZeroU64;
use std::path::PathBuf;

use proptest::prelude::*;

use crate::app_type::AppType;
use crate::channel::{decode_frame, encode_frame, HEADER_SIZE};
use crate::limits::ResourceLimits;
use crate::options::SpawnOptions;
use crate::spawn_method::SpawnMethod;
use crate::timeout::IdleTimeout;

// ============================================================================
// Test Strategies - Input Generation
// ============================================================================

fn idle_timeout() -> impl Strategy<Value = IdleTimeout> {
    prop_oneof![
        Just(IdleTimeout::Default),
        Just(IdleTimeout::Never),
        (1..=i64::MAX as u64).prop_map(|s| IdleTimeout::After(NonZeroU64::new(s).unwrap())),
    ]
}

fn spawn_method() -> impl Strategy<Value = SpawnMethod> {
    prop_oneof![Just(SpawnMethod::Smart), Just(SpawnMethod::Conservative)]
}

fn app_type() -> impl Strategy<Value = AppType> {
    prop_oneof![Just(AppType::Rails), Just(AppType::Rack), Just(AppType::Wsgi)]
}

/// Any record the wire can carry: text fields are arbitrary non-NUL strings.
fn spawn_options() -> impl Strategy<Value = SpawnOptions> {
    (
        "[^\\x00]{0,40}",
        any::<bool>(),
        "[^\\x00]{0,16}",
        "[^\\x00]{1,16}",
        spawn_method(),
        app_type(),
        idle_timeout(),
        idle_timeout(),
        any::<u64>(),
        any::<u64>(),
    )
        .prop_map(
            |(
                app_root,
                lower_privilege,
                lowest_user,
                environment,
                spawn_method,
                app_type,
                framework_spawner_timeout,
                app_spawner_timeout,
                max_requests,
                memory_limit,
            )| SpawnOptions {
                app_root: PathBuf::from(app_root),
                lower_privilege,
                lowest_user,
                environment,
                spawn_method,
                app_type,
                framework_spawner_timeout,
                app_spawner_timeout,
                limits: ResourceLimits {
                    max_requests,
                    memory_limit,
                },
            },
        )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn round_trip_preserves_every_field(options in spawn_options()) {
        let decoded = SpawnOptions::from_tokens(&options.to_tokens(), 0).unwrap();
        prop_assert_eq!(decoded, options);
    }

    #[test]
    fn decodes_after_leading_tokens(
        prefix in prop::collection::vec("[a-z_]{0,12}", 0..8),
        options in spawn_options(),
    ) {
        let offset = prefix.len();
        let mut tokens = prefix;
        options.append_to(&mut tokens);

        prop_assert_eq!(tokens.len(), offset + crate::schema::TOKEN_COUNT);
        let decoded = SpawnOptions::from_tokens(&tokens, offset).unwrap();
        prop_assert_eq!(decoded, options);
    }

    #[test]
    fn keyed_decoding_agrees(options in spawn_options()) {
        let tokens = options.to_tokens();
        prop_assert_eq!(
            SpawnOptions::from_key_values(&tokens).unwrap(),
            SpawnOptions::from_tokens(&tokens, 0).unwrap()
        );
    }

    #[test]
    fn frames_round_trip(tokens in prop::collection::vec("[^\\x00]{0,20}", 0..20)) {
        let frame = encode_frame(&tokens).unwrap();
        prop_assert_eq!(decode_frame(&frame[HEADER_SIZE..]).unwrap(), tokens);
    }

    #[test]
    fn decoder_never_panics(
        tokens in prop::collection::vec(".{0,12}", 0..30),
        offset in 0usize..40,
    ) {
        let _ = SpawnOptions::from_tokens(&tokens, offset);
        let _ = SpawnOptions::from_key_values(&tokens);
    }
}
