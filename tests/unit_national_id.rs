use campus::validation::{
    ChileNationalIdValidator, CountryNationalIdValidator, NationalIdValidator,
    SpainNationalIdValidator,
};

#[test]
fn test_chile_valid_ids() {
    let validator = ChileNationalIdValidator;
    for id in [
        "12345678-5",
        "1234567-4",
        "10000013-K",
        "10000004-0",
        "11111111-1",
        "7654321-6",
        "01234567-4",
    ] {
        assert!(validator.validate(id), "expected valid: {id}");
    }
}

#[test]
fn test_chile_invalid_ids() {
    let validator = ChileNationalIdValidator;
    for id in [
        "12345678-0",
        "10000013-k",
        "10000013-0",
        "123456-0",
        "123456789-1",
        "12345678",
        "12.345.678-5",
        "12345678 -5",
        "",
    ] {
        assert!(!validator.validate(id), "expected invalid: {id}");
    }
}

#[test]
fn test_spain_valid_ids() {
    let validator = SpainNationalIdValidator;
    for id in [
        "X1234567-L",
        "Y1234567-X",
        "Z1234567-R",
        "12345678-Z",
        "23456789-D",
        "87654321-X",
        "00000001-R",
    ] {
        assert!(validator.validate(id), "expected valid: {id}");
    }
}

#[test]
fn test_spain_invalid_ids() {
    let validator = SpainNationalIdValidator;
    for id in [
        "X1234567-A",
        "12345678-z",
        "12345678-A",
        "1234567-L",
        "X12A4567-L",
        "A1234567-L",
        "12345678Z",
        "",
    ] {
        assert!(!validator.validate(id), "expected invalid: {id}");
    }
}

#[test]
fn test_registry_routes_by_country() {
    let registry = NationalIdValidator::default();

    // A Chilean RUN is not a Spanish DNI and vice versa.
    assert!(registry.validate("12345678-5", "Chile"));
    assert!(!registry.validate("12345678-5", "Spain"));
    assert!(registry.validate("12345678-Z", "SPAIN"));
    assert!(!registry.validate("12345678-Z", "chile"));
}

#[test]
fn test_registry_generic_rule_for_unregistered_countries() {
    let registry = NationalIdValidator::default();

    assert!(!registry.has_country("portugal"));
    assert!(registry.validate("PT-123456", "Portugal"));
    assert!(registry.validate("abc123", "france"));
    assert!(!registry.validate("PT 123456", "Portugal"));
    assert!(!registry.validate("PT.123456", "Portugal"));
}
