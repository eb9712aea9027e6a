//! Every caller claim survives generate followed by parse

use proptest::prelude::*;
use tokenguard_jwt::{ClaimSet, ClaimValue, Handle, ManualClock, claims::RESERVED_CLAIMS};

fn claim_value() -> impl Strategy<Value = ClaimValue> {
    let leaf = prop_oneof![
        Just(ClaimValue::Null),
        any::<bool>().prop_map(ClaimValue::Bool),
        any::<i64>().prop_map(ClaimValue::Int),
        prop::num::f64::NORMAL.prop_map(ClaimValue::Float),
        "[a-zA-Z0-9 ._-]{0,24}".prop_map(ClaimValue::String),
        "\\PC{0,24}".prop_map(ClaimValue::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(ClaimValue::List),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(ClaimValue::Map),
        ]
    })
}

fn claim_set() -> impl Strategy<Value = ClaimSet> {
    prop::collection::btree_map("[a-zA-Z_]{1,10}", claim_value(), 0..8).prop_map(|mut claims| {
        claims.retain(|name, _| !RESERVED_CLAIMS.contains(&name.as_str()));
        claims
    })
}

proptest! {
    #[test]
    fn parse_returns_generated_claims(claims in claim_set(), t0 in 0i64..4_000_000_000, lifetime in 1u64..1_000_000) {
        let clock = ManualClock::new(t0);
        let handle = Handle::builder()
            .with_issuer("svc")
            .with_lifetime_secs(lifetime)
            .with_key("secret")
            .with_clock(clock)
            .build();

        let token = handle.generate(&claims).unwrap();
        let parsed = handle.parse(&token).unwrap();

        prop_assert_eq!(&parsed.private, &claims);
        prop_assert_eq!(parsed.issued_at(), t0);
        prop_assert_eq!(parsed.expires_at(), t0 + lifetime as i64);
        prop_assert_eq!(parsed.issuer(), "svc");
    }
}
