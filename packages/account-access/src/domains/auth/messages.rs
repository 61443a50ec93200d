//! User-facing error texts.

use super::errors::FlowErrorKind;
use crate::common::Locale;

/// Text to show under the form for an error, or `None` for errors that
/// indicate a caller bug rather than something the user can act on.
pub fn user_message(kind: FlowErrorKind, locale: Locale) -> Option<&'static str> {
    if !kind.is_user_recoverable() {
        return None;
    }

    let text = match (locale, kind) {
        (Locale::Uk, FlowErrorKind::InvalidPhoneFormat) => "Невірний номер телефону",
        (Locale::Uk, FlowErrorKind::AccountNotFound) => "Такого користувача не знайдено.",
        (Locale::Uk, FlowErrorKind::AccountAlreadyExists) => "Цей користувач вже зареєстрований.",
        (Locale::Uk, FlowErrorKind::MissingProfileField) => "Будь ласка, вкажіть ім'я та e-mail.",
        (Locale::Uk, FlowErrorKind::ServiceUnavailable) => "Помилка. Спробуйте ще раз",
        (Locale::Uk, FlowErrorKind::InvalidCode) => "Невірний код підтвердження",

        (Locale::En, FlowErrorKind::InvalidPhoneFormat) => "Invalid phone number",
        (Locale::En, FlowErrorKind::AccountNotFound) => "No user with this phone number was found.",
        (Locale::En, FlowErrorKind::AccountAlreadyExists) => "This user is already registered.",
        (Locale::En, FlowErrorKind::MissingProfileField) => "Please enter your name and e-mail.",
        (Locale::En, FlowErrorKind::ServiceUnavailable) => "Something went wrong. Please try again",
        (Locale::En, FlowErrorKind::InvalidCode) => "Invalid verification code",

        (_, FlowErrorKind::NoActiveChallenge | FlowErrorKind::StepInFlight) => return None,
    };

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOWN: [FlowErrorKind; 6] = [
        FlowErrorKind::InvalidPhoneFormat,
        FlowErrorKind::AccountNotFound,
        FlowErrorKind::AccountAlreadyExists,
        FlowErrorKind::MissingProfileField,
        FlowErrorKind::ServiceUnavailable,
        FlowErrorKind::InvalidCode,
    ];

    #[test]
    fn test_every_recoverable_error_has_text_in_every_locale() {
        for locale in [Locale::Uk, Locale::En] {
            for kind in SHOWN {
                let text = user_message(kind, locale);
                assert!(
                    text.is_some_and(|t| !t.is_empty()),
                    "missing {:?} text for {:?}",
                    kind,
                    locale
                );
            }
        }
    }

    #[test]
    fn test_misuse_errors_have_no_text() {
        assert_eq!(user_message(FlowErrorKind::NoActiveChallenge, Locale::Uk), None);
        assert_eq!(user_message(FlowErrorKind::StepInFlight, Locale::En), None);
    }

    #[test]
    fn test_ukrainian_texts() {
        assert_eq!(
            user_message(FlowErrorKind::AccountNotFound, Locale::Uk),
            Some("Такого користувача не знайдено.")
        );
        assert_eq!(
            user_message(FlowErrorKind::InvalidCode, Locale::Uk),
            Some("Невірний код підтвердження")
        );
    }
}
