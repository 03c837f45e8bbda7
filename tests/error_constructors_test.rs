use tronity_vehicle::error::VehicleError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        VehicleError::config("x"),
        VehicleError::Config { .. }
    ));
    assert!(matches!(
        VehicleError::sponsor_required("x"),
        VehicleError::SponsorRequired { .. }
    ));
    assert!(matches!(
        VehicleError::http(500, "x"),
        VehicleError::Http { status: 500, .. }
    ));
    assert!(matches!(
        VehicleError::vehicle_not_found("x"),
        VehicleError::VehicleNotFound { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(
        VehicleError::serialization("s"),
        VehicleError::Serialization { .. }
    ));
    assert!(matches!(VehicleError::io("x"), VehicleError::Io { .. }));
    assert!(matches!(
        VehicleError::network("x"),
        VehicleError::Network { .. }
    ));
    assert!(matches!(VehicleError::auth("x"), VehicleError::Auth { .. }));
    assert!(matches!(
        VehicleError::validation("f", "m"),
        VehicleError::Validation { .. }
    ));
    assert!(matches!(
        VehicleError::timeout("x"),
        VehicleError::Timeout { .. }
    ));
}

#[test]
fn status_carried_by_http_and_auth_errors() {
    assert_eq!(VehicleError::http(405, "x").status(), Some(405));
    assert!(VehicleError::http(405, "x").has_status(405));
    assert!(!VehicleError::http(500, "x").has_status(405));
    assert_eq!(VehicleError::auth("x").status(), None);
    assert_eq!(VehicleError::auth_rejected(401, "x").status(), Some(401));
}

#[test]
fn display_messages() {
    let e = VehicleError::validation("field", "bad");
    let s = format!("{}", e);
    assert!(s.contains("Validation error"));

    let e = VehicleError::UnknownProvider {
        name: "nope".to_string(),
    };
    assert!(format!("{}", e).contains("nope"));
}
