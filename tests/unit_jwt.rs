use rollcall::config::jwt::JwtConfig;
use rollcall::rollcall_models::profiles::Role;
use rollcall::utils::jwt::{create_access_token, verify_token};
use uuid::Uuid;

fn test_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret".to_string(),
        access_token_expiry: 3600,
    }
}

#[test]
fn token_round_trip_preserves_claims() {
    let config = test_config();
    let user_id = Uuid::new_v4();

    let token = create_access_token(user_id, "amina", Role::Teacher, &config).unwrap();
    let claims = verify_token(&token, &config).unwrap();

    assert_eq!(claims.sub, user_id.to_string());
    assert_eq!(claims.username, "amina");
    assert_eq!(claims.role, Role::Teacher);
    assert!(claims.exp > claims.iat);
}

#[test]
fn token_with_wrong_secret_is_rejected() {
    let config = test_config();
    let token = create_access_token(Uuid::new_v4(), "amina", Role::Student, &config).unwrap();

    let other = JwtConfig {
        secret: "different-secret".to_string(),
        access_token_expiry: 3600,
    };
    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn garbage_token_is_rejected() {
    assert!(verify_token("not-a-token", &test_config()).is_err());
}
