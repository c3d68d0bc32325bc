//! Request body validation for the account endpoints.
//!
//! Bodies are inspected as raw JSON so every problem is reported at once,
//! including unknown keys and wrong JSON types, instead of stopping at the
//! first serde error. Password values are never echoed back.

use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::domain::{
    CredentialValidationError, Email, LoginCredentials, PasswordChange, PersonName, PlainPassword,
    ProfileField, ProfileFieldValue, ProfileUpdate, ProfileUpdateError, USER_PAGE_MAX, UserPage,
    Username,
};

pub(crate) const UNKNOWN_FIELD: &str = "unknown_field";
pub(crate) const EMPTY_UPDATE: &str = "empty_update";
pub(crate) const INVALID_TYPE: &str = "invalid_type";
pub(crate) const MISSING_FIELD: &str = "missing_field";
pub(crate) const OUT_OF_RANGE: &str = "out_of_range";

const BODY_FIELD: &str = "body";
const OLD_PASSWORD: &str = "oldPassword";
const NEW_PASSWORD: &str = "newPassword";

/// One rejected input field.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub code: String,
    pub message: String,
    /// Offending value, omitted for secrets and unknown keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub value: Option<Value>,
}

impl FieldViolation {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
            value: None,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<FieldViolation>> {
    body.as_object().ok_or_else(|| {
        vec![FieldViolation::new(
            BODY_FIELD,
            INVALID_TYPE,
            "request body must be a JSON object",
        )]
    })
}

fn expect_string<'a>(
    field: &str,
    value: &'a Value,
    echo: bool,
) -> Result<&'a str, FieldViolation> {
    value.as_str().ok_or_else(|| {
        let violation =
            FieldViolation::new(field, INVALID_TYPE, format!("{field} must be a string"));
        if echo {
            violation.with_value(value.clone())
        } else {
            violation
        }
    })
}

fn profile_value(field: ProfileField, raw: &str) -> Result<ProfileFieldValue, FieldViolation> {
    let parsed = match field {
        ProfileField::FirstName => PersonName::new(raw).map(ProfileFieldValue::FirstName),
        ProfileField::LastName => PersonName::new(raw).map(ProfileFieldValue::LastName),
        ProfileField::Email => Email::new(raw).map(ProfileFieldValue::Email),
        ProfileField::Username => Username::new(raw).map(ProfileFieldValue::Username),
    };
    parsed.map_err(|err| {
        FieldViolation::new(field.wire_name(), err.code(), err.to_string())
            .with_value(Value::String(raw.to_owned()))
    })
}

/// Validate a profile update body against the field allowlist.
///
/// ```
/// use accounts::inbound::http::validation::profile_update_from_json;
/// use serde_json::json;
///
/// assert!(profile_update_from_json(&json!({"firstName": "Ada"})).is_ok());
/// let violations = profile_update_from_json(&json!({"followers": 1_000})).unwrap_err();
/// assert_eq!(violations[0].code, "unknown_field");
/// ```
pub fn profile_update_from_json(body: &Value) -> Result<ProfileUpdate, Vec<FieldViolation>> {
    let object = as_object(body)?;
    let mut violations = Vec::new();
    let mut values = Vec::new();

    for (key, value) in object {
        let Some(field) = ProfileField::from_wire(key) else {
            violations.push(FieldViolation::new(
                key.as_str(),
                UNKNOWN_FIELD,
                format!("{key} cannot be updated"),
            ));
            continue;
        };
        match expect_string(key, value, true).and_then(|raw| profile_value(field, raw)) {
            Ok(parsed) => values.push(parsed),
            Err(violation) => violations.push(violation),
        }
    }

    if !violations.is_empty() {
        return Err(violations);
    }
    ProfileUpdate::from_values(values).map_err(|err| {
        let violation = match err {
            ProfileUpdateError::Empty => {
                FieldViolation::new(BODY_FIELD, EMPTY_UPDATE, err.to_string())
            }
            ProfileUpdateError::Duplicate(field) => {
                FieldViolation::new(field.wire_name(), "duplicate_field", err.to_string())
            }
        };
        vec![violation]
    })
}

fn required_password<'a>(
    object: &'a Map<String, Value>,
    field: &str,
) -> Result<&'a str, FieldViolation> {
    let value = object.get(field).ok_or_else(|| {
        FieldViolation::new(field, MISSING_FIELD, format!("{field} is required"))
    })?;
    expect_string(field, value, false)
}

/// Validate a password change body.
pub fn password_change_from_json(body: &Value) -> Result<PasswordChange, Vec<FieldViolation>> {
    let object = as_object(body)?;
    let mut violations: Vec<FieldViolation> = object
        .keys()
        .filter(|key| key.as_str() != OLD_PASSWORD && key.as_str() != NEW_PASSWORD)
        .map(|key| {
            FieldViolation::new(key.as_str(), UNKNOWN_FIELD, format!("{key} is not accepted"))
        })
        .collect();

    let old = required_password(object, OLD_PASSWORD).and_then(|raw| {
        PlainPassword::presented(raw)
            .map_err(|err| FieldViolation::new(OLD_PASSWORD, err.code(), err.to_string()))
    });
    let new = required_password(object, NEW_PASSWORD).and_then(|raw| {
        PlainPassword::chosen(raw)
            .map_err(|err| FieldViolation::new(NEW_PASSWORD, err.code(), err.to_string()))
    });

    match (old, new) {
        (Ok(old), Ok(new)) if violations.is_empty() => Ok(PasswordChange::new(old, new)),
        (old, new) => {
            violations.extend(old.err());
            violations.extend(new.err());
            Err(violations)
        }
    }
}

/// Validate login fields.
pub fn login_credentials(
    username: &str,
    password: &str,
) -> Result<LoginCredentials, Vec<FieldViolation>> {
    LoginCredentials::try_from_parts(username, password).map_err(|err| {
        let field = match err {
            CredentialValidationError::EmptyUsername => "username",
            _ => "password",
        };
        vec![FieldViolation::new(field, err.code(), err.to_string())]
    })
}

/// Validate optional listing parameters. No parameters means no paging.
pub fn user_page(
    limit: Option<u32>,
    offset: Option<u32>,
) -> Result<Option<UserPage>, Vec<FieldViolation>> {
    match (limit, offset) {
        (None, None) => Ok(None),
        (None, Some(offset)) => Err(vec![
            FieldViolation::new("offset", MISSING_FIELD, "offset requires limit")
                .with_value(Value::from(offset)),
        ]),
        (Some(limit), offset) => UserPage::new(limit, offset.unwrap_or(0))
            .map(Some)
            .map_err(|err| {
                vec![
                    FieldViolation::new(
                        "limit",
                        OUT_OF_RANGE,
                        format!("{err}; expected 1..={USER_PAGE_MAX}"),
                    )
                    .with_value(Value::from(limit)),
                ]
            }),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn codes(violations: &[FieldViolation]) -> Vec<(&str, &str)> {
        violations
            .iter()
            .map(|v| (v.field.as_str(), v.code.as_str()))
            .collect()
    }

    #[rstest]
    #[case(json!({"password": "x"}), "password")]
    #[case(json!({"passwordHash": "x"}), "passwordHash")]
    #[case(json!({"ID": "x"}), "ID")]
    #[case(json!({"followers": 9_000}), "followers")]
    fn profile_update_rejects_keys_outside_allowlist(#[case] body: Value, #[case] key: &str) {
        let violations = profile_update_from_json(&body).expect_err("rejected");
        assert_eq!(codes(&violations), vec![(key, UNKNOWN_FIELD)]);
        assert!(violations[0].value.is_none());
    }

    #[rstest]
    fn profile_update_collects_every_violation() {
        let body = json!({
            "firstName": 42,
            "email": "not-an-email",
            "username": "a!",
            "followers": 1,
        });
        let violations = profile_update_from_json(&body).expect_err("rejected");
        let mut found = codes(&violations);
        found.sort_unstable();
        assert_eq!(
            found,
            vec![
                ("email", "invalid_email"),
                ("firstName", INVALID_TYPE),
                ("followers", UNKNOWN_FIELD),
                ("username", "too_short"),
            ]
        );
    }

    #[rstest]
    #[case(json!({}))]
    fn profile_update_requires_a_field(#[case] body: Value) {
        let violations = profile_update_from_json(&body).expect_err("rejected");
        assert_eq!(codes(&violations), vec![(BODY_FIELD, EMPTY_UPDATE)]);
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!("firstName"))]
    #[case(json!(null))]
    fn profile_update_requires_an_object(#[case] body: Value) {
        let violations = profile_update_from_json(&body).expect_err("rejected");
        assert_eq!(codes(&violations), vec![(BODY_FIELD, INVALID_TYPE)]);
    }

    #[rstest]
    fn profile_update_accepts_allowlisted_fields() {
        let update = profile_update_from_json(&json!({
            "firstName": "  Grace ",
            "lastName": "Hopper",
            "email": "grace@example.com",
            "username": "grace.h",
        }))
        .expect("valid");
        assert_eq!(update.first_name().map(AsRef::as_ref), Some("Grace"));
        assert_eq!(update.fields().len(), 4);
    }

    #[rstest]
    fn password_change_reports_missing_and_unknown_fields() {
        let violations =
            password_change_from_json(&json!({"password": "secret"})).expect_err("rejected");
        assert_eq!(
            codes(&violations),
            vec![
                ("password", UNKNOWN_FIELD),
                (OLD_PASSWORD, MISSING_FIELD),
                (NEW_PASSWORD, MISSING_FIELD),
            ]
        );
    }

    #[rstest]
    #[case(json!({"oldPassword": "", "newPassword": "long-enough"}), OLD_PASSWORD, "empty_value")]
    #[case(json!({"oldPassword": "old", "newPassword": "short"}), NEW_PASSWORD, "too_short")]
    #[case(json!({"oldPassword": "old", "newPassword": 12_345_678}), NEW_PASSWORD, INVALID_TYPE)]
    fn password_change_checks_values(
        #[case] body: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let violations = password_change_from_json(&body).expect_err("rejected");
        assert_eq!(codes(&violations), vec![(field, code)]);
    }

    #[rstest]
    fn password_violations_never_echo_values() {
        let violations = password_change_from_json(&json!({
            "oldPassword": 1,
            "newPassword": "tiny",
        }))
        .expect_err("rejected");
        assert!(violations.iter().all(|v| v.value.is_none()));
    }

    #[rstest]
    fn password_change_accepts_valid_body() {
        let change = password_change_from_json(&json!({
            "oldPassword": "old",
            "newPassword": "new-password",
        }))
        .expect("valid");
        assert_eq!(change.new_password().expose(), "new-password");
    }

    #[rstest]
    #[case(None, None, Ok(None))]
    #[case(Some(10), None, Ok(Some((10, 0))))]
    #[case(Some(10), Some(20), Ok(Some((10, 20))))]
    #[case(Some(0), None, Err("limit"))]
    #[case(Some(USER_PAGE_MAX + 1), None, Err("limit"))]
    #[case(None, Some(5), Err("offset"))]
    fn user_page_rules(
        #[case] limit: Option<u32>,
        #[case] offset: Option<u32>,
        #[case] expected: Result<Option<(u32, u32)>, &str>,
    ) {
        let result = user_page(limit, offset)
            .map(|page| page.map(|p| (p.limit(), p.offset())))
            .map_err(|violations| violations[0].field.clone());
        assert_eq!(result, expected.map_err(str::to_owned));
    }

    #[rstest]
    #[case("  ", "pw", "username")]
    #[case("ada", "", "password")]
    fn login_blank_fields_are_violations(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let violations = login_credentials(username, password).expect_err("rejected");
        assert_eq!(violations[0].field, field);
        assert_eq!(violations[0].code, "empty_value");
    }
}
