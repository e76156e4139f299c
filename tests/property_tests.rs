use chrono::DateTime;
use proptest::prelude::*;
use restaurant_user::encryption::{digest, DIGEST_LEN};
use restaurant_user::proto;
use restaurant_user::repository::entity;
use restaurant_user::service::dto;

fn arb_user() -> impl Strategy<Value = dto::User> {
    (
        any::<u64>(),
        ".*",
        ".*",
        ".*",
        ".*",
        proptest::option::of(1i64..4_000_000_000),
        proptest::option::of(1i64..4_000_000_000),
    )
        .prop_map(
            |(id, first_name, last_name, email, password, created, updated)| dto::User {
                id,
                first_name,
                last_name,
                email,
                password,
                created_at: created.and_then(|secs| DateTime::from_timestamp(secs, 0)),
                updated_at: updated.and_then(|secs| DateTime::from_timestamp(secs, 0)),
            },
        )
}

proptest! {
    #[test]
    fn digest_is_deterministic(input in ".*") {
        prop_assert_eq!(digest(&input), digest(&input));
    }

    #[test]
    fn digest_length_is_fixed(input in ".{0,2048}") {
        let output = digest(&input);
        prop_assert_eq!(output.len(), DIGEST_LEN);
        prop_assert!(output.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn wire_entity_wire_is_identity(user in arb_user()) {
        let entity = entity::User::from(user.clone());
        prop_assert_eq!(dto::User::from(entity), user);
    }

    #[test]
    fn wire_proto_wire_is_identity(user in arb_user()) {
        let message = proto::User::from(user.clone());
        prop_assert_eq!(dto::User::from(message), user);
    }
}
