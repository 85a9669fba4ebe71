use serde::Deserialize;
use validator::Validate;

use tours_core::services::{SignupInput, UpdateMeInput};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirm: String,
}

impl From<SignupRequest> for SignupInput {
    fn from(request: SignupRequest) -> Self {
        SignupInput {
            name: request.name,
            email: request.email,
            password: request.password,
            password_confirm: request.password_confirm,
        }
    }
}

/// Missing fields are reported by the login rule, not the parser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "Please provide your email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password_current: String,
    pub password: String,
    pub password_confirm: String,
}

/// Profile update; password fields are accepted only to be rejected
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub password_confirm: Option<String>,
}

impl From<UpdateMeRequest> for UpdateMeInput {
    fn from(request: UpdateMeRequest) -> Self {
        UpdateMeInput {
            name: request.name,
            email: request.email,
            password: request.password,
            password_confirm: request.password_confirm,
        }
    }
}

/// Account settings form posted from the `/me` page
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserDataForm {
    #[validate(length(min = 1, max = 40, message = "A user must have a name"))]
    pub name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

impl From<UserDataForm> for UpdateMeInput {
    fn from(form: UserDataForm) -> Self {
        UpdateMeInput {
            name: Some(form.name),
            email: Some(form.email),
            password: None,
            password_confirm: None,
        }
    }
}
