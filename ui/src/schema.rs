//! Declarative validation schemas for the auth form.
//!
//! A schema is a fixed list of per-field checks; validation runs every rule
//! and collects every violation (at most one message per field, the first
//! failing check wins), so the form can annotate all offending fields in one
//! pass instead of stopping at the first.

use std::collections::BTreeMap;

/// Transient draft of the sign-in / sign-up form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormDraft {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl FormDraft {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
        }
    }
}

/// Form fields addressed by the schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Email,
    Password,
    FirstName,
    LastName,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
            Field::FirstName => "First name",
            Field::LastName => "Last name",
        }
    }
}

/// Field-scoped validation messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn insert(&mut self, field: Field, message: String) {
        self.0.insert(field, message);
    }
}

#[derive(Debug, Clone, Copy)]
enum Check {
    Required,
    Email,
    MinLen(usize),
}

impl Check {
    fn violation(self, field: Field, value: &str) -> Option<String> {
        match self {
            Check::Required if value.is_empty() => Some(format!("{} is required", field.label())),
            Check::Email if !is_valid_email(value) => Some("Invalid email".to_string()),
            Check::MinLen(min) if value.len() < min => Some(format!(
                "{} must be at least {min} characters",
                field.label()
            )),
            _ => None,
        }
    }
}

struct Rule {
    field: Field,
    checks: &'static [Check],
}

/// A declarative rule set over the form draft.
pub struct Schema {
    rules: &'static [Rule],
}

/// Rules for the sign-up form.
pub const SIGN_UP: Schema = Schema {
    rules: &[
        Rule {
            field: Field::Email,
            checks: &[Check::Required, Check::Email],
        },
        Rule {
            field: Field::Password,
            checks: &[Check::Required, Check::MinLen(6)],
        },
        Rule {
            field: Field::FirstName,
            checks: &[Check::Required],
        },
        Rule {
            field: Field::LastName,
            checks: &[Check::Required],
        },
    ],
};

/// Rules for the sign-in form: only the credentials are checked.
pub const SIGN_IN: Schema = Schema {
    rules: &[
        Rule {
            field: Field::Email,
            checks: &[Check::Required, Check::Email],
        },
        Rule {
            field: Field::Password,
            checks: &[Check::Required],
        },
    ],
};

impl Schema {
    /// Check every rule and collect every violation.
    ///
    /// Emails and names are trimmed before checking; passwords are taken
    /// verbatim.
    pub fn validate(&self, draft: &FormDraft) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        for rule in self.rules {
            let raw = draft.value(rule.field);
            let value = match rule.field {
                Field::Password => raw,
                _ => raw.trim(),
            };
            if let Some(message) = rule
                .checks
                .iter()
                .find_map(|check| check.violation(rule.field, value))
            {
                errors.insert(rule.field, message);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sign_up_draft() -> FormDraft {
        FormDraft {
            email: "a@b.com".to_string(),
            password: "123456".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        }
    }

    #[test]
    fn empty_sign_up_draft_collects_every_violation() {
        let errors = SIGN_UP
            .validate(&FormDraft::default())
            .expect_err("empty draft must fail");
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
        assert_eq!(errors.get(Field::LastName), Some("Last name is required"));
    }

    #[test]
    fn bad_email_and_short_password_are_both_reported() {
        let draft = FormDraft {
            email: "not-an-email".to_string(),
            password: "123".to_string(),
            ..valid_sign_up_draft()
        };
        let errors = SIGN_UP.validate(&draft).expect_err("draft must fail");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(Field::Email), Some("Invalid email"));
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn valid_sign_up_draft_passes() {
        assert!(SIGN_UP.validate(&valid_sign_up_draft()).is_ok());
    }

    #[test]
    fn sign_in_schema_ignores_the_name_fields() {
        let draft = FormDraft {
            email: "a@b.com".to_string(),
            password: "x".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        };
        assert!(SIGN_IN.validate(&draft).is_ok());
    }

    #[test]
    fn whitespace_only_names_are_missing() {
        let draft = FormDraft {
            first_name: "   ".to_string(),
            ..valid_sign_up_draft()
        };
        let errors = SIGN_UP.validate(&draft).expect_err("draft must fail");
        assert_eq!(errors.get(Field::FirstName), Some("First name is required"));
    }

    #[test]
    fn password_is_not_trimmed() {
        let draft = FormDraft {
            password: "12345 ".to_string(),
            ..valid_sign_up_draft()
        };
        assert!(SIGN_UP.validate(&draft).is_ok());
    }

    #[test]
    fn email_shape_checks() {
        assert!(is_valid_email("a@b.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("plain"));
    }
}
