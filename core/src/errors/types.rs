//! Authentication and token error types
//!
//! Messages are client facing; the presentation layer maps each variant to
//! a status code.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please provide email and password!")]
    MissingCredentials,

    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("You are not logged in! Please log in to get access.")]
    NotLoggedIn,

    #[error("The user belonging to this token does no longer exist.")]
    UserNoLongerExists,

    #[error("User recently changed password! Please log in again.")]
    PasswordChangedAfterToken,

    #[error("You do not have permission to perform this action")]
    InsufficientPermissions,

    #[error("Your current password is wrong.")]
    IncorrectCurrentPassword,

    #[error("There is no user with that email address.")]
    EmailNotFound,

    #[error("Token is invalid or has expired")]
    ResetTokenInvalid,

    #[error("There was an error sending the email. Try again later!")]
    EmailDeliveryFailed,

    #[error("This route is not for password updates. Please use /updateMyPassword.")]
    PasswordUpdateNotAllowed,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Your token has expired! Please log in again.")]
    TokenExpired,

    #[error("Invalid token. Please log in again!")]
    InvalidToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}
