use std::error::Error;
use gymdesk_core::errors::{GymError, GymResult};

#[test]
fn test_gym_error_display() {
    let not_found = GymError::NotFound("Enquiry not found".to_string());
    let validation = GymError::Validation("Invalid input".to_string());
    let authentication = GymError::Authentication("Invalid password".to_string());
    let authorization = GymError::Authorization("Not authorized".to_string());
    let conflict = GymError::Conflict("Attendance already marked".to_string());
    let database = GymError::Database(eyre::eyre!("Database connection failed"));
    let internal = GymError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(not_found.to_string(), "Resource not found: Enquiry not found");
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        authentication.to_string(),
        "Authentication error: Invalid password"
    );
    assert_eq!(authorization.to_string(), "Authorization error: Not authorized");
    assert_eq!(conflict.to_string(), "Conflict: Attendance already marked");
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_public_message_hides_driver_details() {
    let database = GymError::Database(eyre::eyre!("relation \"enquiries\" does not exist"));
    assert_eq!(database.public_message(), "Internal server error");

    let validation = GymError::Validation("Mobile number is required".to_string());
    assert_eq!(validation.public_message(), "Mobile number is required");
}

#[test]
fn test_error_conversion() {
    let io_error = std::io::Error::other("IO error");
    let gym_error = GymError::Internal(Box::new(io_error));

    assert!(gym_error.source().is_some());
}

#[test]
fn test_gym_result() {
    let result: GymResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: GymResult<i32> = Err(GymError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_eyre_report() {
    let gym_error: GymError = eyre::eyre!("Database error").into();

    assert!(matches!(gym_error, GymError::Database(_)));
    assert!(gym_error.to_string().contains("Database error"));
}
