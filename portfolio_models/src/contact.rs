use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

/// Characters matched by `\s` in browser regular expressions. The Unicode
/// `\s` of [`Regex`] differs in U+0085 and U+FEFF.
const WHITESPACE: &str = r"\t\n\v\f\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// Shape an address must have to be accepted from the contact form:
/// `local@domain.tld` without whitespace or additional `@` signs.
pub static CONTACT_EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let part = format!("[^{WHITESPACE}@]+");
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: ContactMessageAuthorEmail,
}

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    validate(regex = CONTACT_EMAIL_REGEX),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageAuthorEmail(String);

#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageContent(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactMessageError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Invalid email address")]
    InvalidEmail,
}

impl ContactMessage {
    /// Validates raw form input.
    ///
    /// Every field must be present and non-empty before the email address is
    /// checked, so a submission with an empty name and a malformed address
    /// reports [`ContactMessageError::MissingFields`].
    pub fn parse(
        name: Option<String>,
        email: Option<String>,
        content: Option<String>,
    ) -> Result<Self, ContactMessageError> {
        let (Some(name), Some(email), Some(content)) = (
            name.and_then(|name| ContactMessageAuthorName::try_new(name).ok()),
            email.filter(|email| !email.is_empty()),
            content.and_then(|content| ContactMessageContent::try_new(content).ok()),
        ) else {
            return Err(ContactMessageError::MissingFields);
        };

        let email = ContactMessageAuthorEmail::try_new(email)
            .map_err(|_| ContactMessageError::InvalidEmail)?;

        Ok(Self {
            author: ContactMessageAuthor { name, email },
            content,
        })
    }
}
