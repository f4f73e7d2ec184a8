use chrono::{TimeZone, Utc};
use medcare_hms::models::{Identity, LoginResponse, RegisterRequest, Role};
use serde_json::json;

// --- Tests ---

#[test]
fn test_identity_decodes_backend_user_document() {
    // Shape of the backend's user document, including fields the client ignores.
    let body = json!({
        "id": "6f1c1c9e-2a8d-4c57-9b8e-3f5a1b2c3d4e",
        "email": "doctor@hospital.com",
        "full_name": "Dr. Sarah Johnson",
        "role": "doctor",
        "phone": null,
        "created_at": "2024-03-01T09:30:00.123456Z",
        "is_active": true
    });

    let identity: Identity = serde_json::from_value(body).unwrap();

    assert_eq!(identity.role, Role::Doctor);
    assert_eq!(identity.full_name, "Dr. Sarah Johnson");
    assert_eq!(identity.phone, None);
    assert_eq!(
        identity.created_at.map(|t| t.date_naive()),
        Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap().date_naive())
    );
}

#[test]
fn test_identity_accepts_naive_and_garbage_timestamps() {
    let naive: Identity = serde_json::from_value(json!({
        "id": "6f1c1c9e-2a8d-4c57-9b8e-3f5a1b2c3d4e",
        "email": "nurse@hospital.com",
        "full_name": "Nurse",
        "role": "nurse",
        "created_at": "2024-03-01T09:30:00.123000"
    }))
    .unwrap();
    let expected =
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap() + chrono::Duration::milliseconds(123);
    assert_eq!(naive.created_at, Some(expected));

    let garbage: Identity = serde_json::from_value(json!({
        "id": "6f1c1c9e-2a8d-4c57-9b8e-3f5a1b2c3d4e",
        "email": "nurse@hospital.com",
        "full_name": "Nurse",
        "role": "nurse",
        "created_at": "yesterday"
    }))
    .unwrap();
    assert_eq!(garbage.created_at, None);
}

#[test]
fn test_unknown_role_is_rejected() {
    let result = serde_json::from_value::<Identity>(json!({
        "id": "6f1c1c9e-2a8d-4c57-9b8e-3f5a1b2c3d4e",
        "email": "x@hospital.com",
        "full_name": "X",
        "role": "janitor"
    }));
    assert!(result.is_err());
}

#[test]
fn test_role_parsing_and_display() {
    assert_eq!("Doctor".parse::<Role>(), Ok(Role::Doctor));
    assert_eq!(" patient ".parse::<Role>(), Ok(Role::Patient));
    assert!("surgeon".parse::<Role>().is_err());

    for role in Role::ALL {
        assert_eq!(role.to_string().parse::<Role>(), Ok(role));
        assert_eq!(serde_json::to_value(role).unwrap(), json!(role.as_str()));
    }
}

#[test]
fn test_role_badges() {
    assert_eq!(Role::Admin.badge_color(), "red");
    assert_eq!(Role::Doctor.badge_color(), "blue");
    assert_eq!(Role::Nurse.badge_color(), "green");
    assert_eq!(Role::Patient.badge_color(), "purple");
}

#[test]
fn test_login_response_defaults_token_type() {
    let response: LoginResponse = serde_json::from_value(json!({
        "user": {
            "id": "6f1c1c9e-2a8d-4c57-9b8e-3f5a1b2c3d4e",
            "email": "admin@hospital.com",
            "full_name": "Admin",
            "role": "admin"
        },
        "access_token": "abc"
    }))
    .unwrap();

    assert_eq!(response.token_type, "bearer");
    assert_eq!(response.user.role, Role::Admin);
}

#[test]
fn test_register_request_omits_missing_phone() {
    let request = RegisterRequest {
        email: "p@hospital.com".to_string(),
        password: "pw".to_string(),
        full_name: "P".to_string(),
        role: Role::Patient,
        phone: None,
    };

    let value = serde_json::to_value(&request).unwrap();
    assert_eq!(value["role"], "patient");
    assert!(value.get("phone").is_none());
}
