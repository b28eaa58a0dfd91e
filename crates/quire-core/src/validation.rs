use crate::blog::{BlogId, BlogInput};
use crate::error::ValidationError;
use crate::session::{Credentials, Registration};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Client-side form checks, run before any request is issued.
pub struct Validator;

impl Validator {
    /// Validate a required free-text field.
    pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field));
        }
        Ok(())
    }

    /// Validate login input.
    pub fn validate_credentials(creds: &Credentials) -> Result<(), ValidationError> {
        Self::validate_required("email", &creds.email)?;
        if creds.password.is_empty() {
            return Err(ValidationError::MissingField("password"));
        }
        Ok(())
    }

    /// Validate registration input.
    /// Confirmation mismatch is reported before length, matching the form's order.
    pub fn validate_registration(reg: &Registration) -> Result<(), ValidationError> {
        Self::validate_required("name", &reg.name)?;
        Self::validate_required("email", &reg.email)?;
        if reg.password != reg.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        let len = reg.password.chars().count();
        if len < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(len));
        }
        Ok(())
    }

    /// Validate blog fields before publishing.
    /// Title and body are required; everything else is optional.
    pub fn validate_blog_input(input: &BlogInput) -> Result<(), ValidationError> {
        Self::validate_required("title", &input.title)?;
        Self::validate_required("content", &input.content)?;
        Ok(())
    }

    /// Validate a blog id before it is interpolated into a request path.
    pub fn validate_blog_id(id: &BlogId) -> Result<(), ValidationError> {
        let s = id.as_str();
        if s.is_empty()
            || !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError::InvalidBlogId(s.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(password: &str, confirm: &str) -> Registration {
        Registration {
            name: "Ada".to_string(),
            email: "ada@blog.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_valid_registration() {
        assert!(Validator::validate_registration(&registration("123456", "123456")).is_ok());
    }

    #[test]
    fn test_password_too_short() {
        assert_eq!(
            Validator::validate_registration(&registration("12345", "12345")),
            Err(ValidationError::PasswordTooShort(5))
        );
    }

    #[test]
    fn test_password_mismatch_reported_first() {
        assert_eq!(
            Validator::validate_registration(&registration("123", "456")),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_registration_requires_name_and_email() {
        let mut reg = registration("123456", "123456");
        reg.name = "  ".to_string();
        assert_eq!(
            Validator::validate_registration(&reg),
            Err(ValidationError::MissingField("name"))
        );

        let mut reg = registration("123456", "123456");
        reg.email.clear();
        assert_eq!(
            Validator::validate_registration(&reg),
            Err(ValidationError::MissingField("email"))
        );
    }

    #[test]
    fn test_credentials() {
        assert!(Validator::validate_credentials(&Credentials::new("a@b.c", "x")).is_ok());
        assert!(Validator::validate_credentials(&Credentials::new("", "x")).is_err());
        assert!(Validator::validate_credentials(&Credentials::new("a@b.c", "")).is_err());
    }

    #[test]
    fn test_blog_input() {
        assert!(Validator::validate_blog_input(&BlogInput::new("T", "<p>x</p>")).is_ok());
        assert_eq!(
            Validator::validate_blog_input(&BlogInput::new(" ", "<p>x</p>")),
            Err(ValidationError::MissingField("title"))
        );
        assert_eq!(
            Validator::validate_blog_input(&BlogInput::new("T", "\n")),
            Err(ValidationError::MissingField("content"))
        );
    }

    #[test]
    fn test_blog_id() {
        assert!(Validator::validate_blog_id(&BlogId::new("65f1c0ab12")).is_ok());
        assert!(Validator::validate_blog_id(&BlogId::new("")).is_err());
        assert!(Validator::validate_blog_id(&BlogId::new("../auth")).is_err());
        assert!(Validator::validate_blog_id(&BlogId::new("a b")).is_err());
    }
}
