use serde::Serialize;

/// Login form fields in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Email,
    Password,
    Remember,
}

impl Field {
    pub fn next(&self) -> Field {
        match self {
            Field::Email => Field::Password,
            Field::Password => Field::Remember,
            Field::Remember => Field::Email,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Email => "Email",
            Field::Password => "Password",
            Field::Remember => "Remember me",
        }
    }

    /// Whether the field takes typed text
    pub fn is_text(&self) -> bool {
        !matches!(self, Field::Remember)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Static login form. Submitting only checks that fields are filled in.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub remember: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Email => Some(&mut self.email),
            Field::Password => Some(&mut self.password),
            Field::Remember => None,
        }
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        if let Some(value) = self.value_mut(field) {
            value.push(c);
        }
    }

    pub fn pop_char(&mut self, field: Field) {
        if let Some(value) = self.value_mut(field) {
            value.pop();
        }
    }

    pub fn toggle_remember(&mut self) {
        self.remember = !self.remember;
    }

    /// Password rendered as bullets
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    /// Presence checks; empty when the form is complete
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError {
                field: Field::Email,
                message: "Email is required".to_string(),
            });
        }
        if self.password.is_empty() {
            errors.push(FieldError {
                field: Field::Password,
                message: "Password is required".to_string(),
            });
        }
        errors
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
