//! Enum tests for the entity crate

use entity::sea_orm_active_enums::Severity;
use sea_orm::{ActiveEnum, Iterable};

/// Display matches the stored value
#[test]
fn test_severity_display() {
    assert_eq!(format!("{}", Severity::Low), "low");
    assert_eq!(format!("{}", Severity::Medium), "medium");
    assert_eq!(format!("{}", Severity::High), "high");
}

/// Stored values round through the active enum
#[test]
fn test_severity_active_enum_values() {
    for severity in Severity::iter() {
        assert_eq!(severity.to_value(), severity.as_str());
        assert_eq!(Severity::try_from_value(&severity.to_value()).unwrap(), severity);
    }
    assert!(Severity::try_from_value(&"critical".to_string()).is_err());
}

/// Serde uses the lowercase names
#[test]
fn test_severity_serde() {
    assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
    let parsed: Severity = serde_json::from_str("\"medium\"").unwrap();
    assert_eq!(parsed, Severity::Medium);
    assert!(serde_json::from_str::<Severity>("\"HIGH\"").is_err());
}

/// Parsing from query strings
#[test]
fn test_severity_from_str() {
    assert_eq!("low".parse::<Severity>(), Ok(Severity::Low));
    assert!("".parse::<Severity>().is_err());
}

/// Ordering follows severity
#[test]
fn test_severity_ordering() {
    assert!(Severity::Low < Severity::Medium);
    assert!(Severity::Medium < Severity::High);
}
