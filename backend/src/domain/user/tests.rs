//! Validation coverage for user value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6", true)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", false)]
#[case("", false)]
#[case("42", false)]
fn user_id_requires_canonical_uuid(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(UserId::new(raw).is_ok(), ok);
}

#[rstest]
fn user_id_serialises_as_string() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    let value = serde_json::to_value(id).expect("serialise id");
    assert_eq!(value, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
}

#[rstest]
#[case("  Ada  ", Ok("Ada"))]
#[case("   ", Err(UserValidationError::EmptyName))]
#[case(&"x".repeat(51), Err(UserValidationError::NameTooLong { max: 50 }))]
fn person_name_is_trimmed_and_bounded(
    #[case] raw: &str,
    #[case] expected: Result<&str, UserValidationError>,
) {
    let result = PersonName::new(raw);
    match expected {
        Ok(value) => assert_eq!(result.expect("valid name").as_ref(), value),
        Err(err) => assert_eq!(result.expect_err("invalid name"), err),
    }
}

#[rstest]
#[case("ada@example.com", true)]
#[case(" ada@example.com ", true)]
#[case("ada@example", false)]
#[case("ada example@x.io", false)]
#[case("@example.com", false)]
#[case("", false)]
fn email_shape(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(Email::new(raw).is_ok(), ok);
}

#[rstest]
#[case("ada_l.1", Ok(()))]
#[case("ab", Err(UserValidationError::UsernameTooShort { min: 3 }))]
#[case(&"a".repeat(33), Err(UserValidationError::UsernameTooLong { max: 32 }))]
#[case("ada lovelace", Err(UserValidationError::UsernameInvalidCharacters))]
#[case("ada!", Err(UserValidationError::UsernameInvalidCharacters))]
fn username_rules(#[case] raw: &str, #[case] expected: Result<(), UserValidationError>) {
    assert_eq!(Username::new(raw).map(|_| ()), expected);
}

#[rstest]
fn validation_codes_are_stable() {
    assert_eq!(UserValidationError::InvalidEmail.code(), "invalid_email");
    assert_eq!(
        UserValidationError::UsernameTooShort { min: 3 }.code(),
        "too_short"
    );
    assert_eq!(UserValidationError::EmptyName.code(), "empty_value");
}
