//! Process-wide default handle

use std::sync::Arc;
use tokenguard_jwt::{ClaimSet, ClaimValue, Config, Handle, ManualClock, MemoryStore, global};

fn claims() -> ClaimSet {
    let mut claims = ClaimSet::new();
    claims.insert("uid".into(), 7.into());
    claims
}

// Single test: the default handle is process state shared by every test in
// this binary.
#[test]
fn default_handle_can_be_replaced() {
    let default = global::handle();
    assert_eq!(default.issuer(), Config::default().issuer);

    let token = global::generate(&claims()).unwrap();
    assert!(global::is_valid(&token));
    assert_eq!(
        global::parse(&token).unwrap().get("uid"),
        Some(&ClaimValue::Int(7))
    );

    let clock = ManualClock::new(1000);
    let replacement = Arc::new(
        Handle::builder()
            .with_issuer("svc")
            .with_lifetime_secs(3600)
            .with_key("replacement")
            .with_clock(clock.clone())
            .with_store(MemoryStore::with_clock(clock))
            .build(),
    );
    global::set_handle(Arc::clone(&replacement));
    assert!(Arc::ptr_eq(&global::handle(), &replacement));

    // Tokens from the old default no longer verify under the new key.
    assert!(!global::is_valid(&token));
    // The old handle is still usable by whoever holds it.
    assert!(default.is_valid(&token));

    let token = global::generate(&claims()).unwrap();
    assert_eq!(global::parse(&token).unwrap().issued_at(), 1000);
    global::revoke(&token).unwrap();
    assert!(global::is_valid(&token));
    assert!(global::parse(&token).unwrap_err().is_revoked());

    let req = http::Request::builder()
        .uri("/")
        .header("Authorization", format!("Bearer {token}"))
        .body(())
        .unwrap();
    assert!(global::is_valid_request(&req));
    assert!(global::parse_request(&req).unwrap_err().is_revoked());

    let form = http::Request::builder()
        .method("POST")
        .uri("/")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!("Authorization={token}"))
        .unwrap();
    assert!(!global::is_valid_request(&form));
    assert!(global::is_valid_request_with_body(&form));
    assert!(global::parse_request_with_body(&form).unwrap_err().is_revoked());
}
