use std::sync::Arc;

use tracing::{debug, instrument};

use super::{Effect, Screen};
use crate::auth::services::{
    check_email_format, check_password_format, validate_email, validate_password,
};
use crate::auth::{CredentialStore, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

impl LoginField {
    pub fn label(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

/// An input box and the error currently shown under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    pub text: String,
    pub error: Option<ValidationError>,
}

pub struct LoginScreen {
    credentials: Arc<dyn CredentialStore>,
    email: TextField,
    password: TextField,
}

impl LoginScreen {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            credentials,
            email: TextField::default(),
            password: TextField::default(),
        }
    }

    pub fn email(&self) -> &TextField {
        &self.email
    }

    pub fn password(&self) -> &TextField {
        &self.password
    }

    pub fn on_email_changed(&mut self, text: &str) {
        self.email.text = text.to_owned();
        self.email.error = check_email_format(text);
    }

    pub fn on_password_changed(&mut self, text: &str) {
        self.password.text = text.to_owned();
        self.password.error = check_password_format(text);
    }

    #[instrument(skip(self))]
    pub async fn submit_login(&mut self) -> anyhow::Result<Vec<Effect>> {
        let (email, password) = match self.validated_input() {
            Ok(input) => input,
            Err(effect) => return Ok(vec![effect]),
        };

        if self.credentials.authenticate(&email, &password).await? {
            Ok(vec![
                Effect::toast("Login successful"),
                Effect::SignedIn(email),
                Effect::Push(Screen::Profile),
            ])
        } else {
            Ok(vec![Effect::toast("Incorrect email or password")])
        }
    }

    #[instrument(skip(self))]
    pub async fn submit_register(&mut self) -> anyhow::Result<Vec<Effect>> {
        let (email, password) = match self.validated_input() {
            Ok(input) => input,
            Err(effect) => return Ok(vec![effect]),
        };

        if self.credentials.register(&email, &password).await? {
            Ok(vec![
                Effect::toast("Account created"),
                Effect::SignedIn(email),
                Effect::Push(Screen::Profile),
            ])
        } else {
            Ok(vec![Effect::toast("This email is already registered")])
        }
    }

    pub fn wechat_login(&self) -> Vec<Effect> {
        vec![Effect::toast("WeChat login")]
    }

    pub fn apple_login(&self) -> Vec<Effect> {
        vec![Effect::toast("Apple login")]
    }

    /// Trimmed email and raw password, or the first field error found. The
    /// error is also pinned on the offending field.
    fn validated_input(&mut self) -> Result<(String, String), Effect> {
        let email = self.email.text.trim().to_owned();
        let password = self.password.text.clone();

        let failure = if email.is_empty() {
            Some((LoginField::Email, ValidationError::EmailRequired))
        } else if password.is_empty() {
            Some((LoginField::Password, ValidationError::PasswordRequired))
        } else if let Err(e) = validate_email(&email) {
            Some((LoginField::Email, e))
        } else if let Err(e) = validate_password(&password) {
            Some((LoginField::Password, e))
        } else {
            None
        };

        match failure {
            Some((field, error)) => {
                debug!(field = field.label(), %error, "submit blocked by validation");
                match field {
                    LoginField::Email => self.email.error = Some(error),
                    LoginField::Password => self.password.error = Some(error),
                }
                Err(Effect::FieldError(field, error))
            }
            None => Ok((email, password)),
        }
    }
}
