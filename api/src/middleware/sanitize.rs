//! Request body sanitization.
//!
//! [`CleanJson`] replaces `web::Json` for every body bound to an entity:
//! keys that could be read as query operators (`$gt`, `a.b`) are dropped and
//! markup in string values is neutralized before deserialization.

use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ops::Deref;

use crate::handlers::ApiError;

/// Escapes angle brackets so stored text cannot open a tag
fn neutralize_markup(input: &str) -> String {
    if !input.contains(['<', '>']) {
        return input.to_string();
    }
    input.replace('<', "&lt;").replace('>', "&gt;")
}

fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Recursively cleans a JSON value in place
pub fn sanitize_value(value: &mut Value) {
    match value {
        Value::String(text) => *text = neutralize_markup(text),
        Value::Array(items) => items.iter_mut().for_each(sanitize_value),
        Value::Object(map) => {
            let cleaned: Map<String, Value> = std::mem::take(map)
                .into_iter()
                .filter(|(key, _)| !is_operator_key(key))
                .map(|(key, mut value)| {
                    sanitize_value(&mut value);
                    (key, value)
                })
                .collect();
            *map = cleaned;
        }
        _ => {}
    }
}

/// JSON body extractor that sanitizes before deserializing into `T`
#[derive(Debug)]
pub struct CleanJson<T>(pub T);

impl<T> CleanJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for CleanJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for CleanJson<T> {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let body = web::Json::<Value>::from_request(req, payload);
        Box::pin(async move {
            let mut value = body.await?.into_inner();
            sanitize_value(&mut value);
            let parsed = serde_json::from_value(value)
                .map_err(|e| ApiError::BadRequest(format!("Invalid input data. {e}")))?;
            Ok(CleanJson(parsed))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_keys_are_dropped() {
        let mut body = json!({
            "email": {"$gt": ""},
            "password": "pass1234",
            "profile.role": "admin"
        });
        sanitize_value(&mut body);
        assert_eq!(body, json!({"email": {}, "password": "pass1234"}));
    }

    #[test]
    fn test_markup_is_escaped_at_any_depth() {
        let mut body = json!({
            "name": "<script>alert(1)</script>",
            "locations": [{"description": "<b>Bay</b>"}],
            "price": 497
        });
        sanitize_value(&mut body);
        assert_eq!(body["name"], "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert_eq!(body["locations"][0]["description"], "&lt;b&gt;Bay&lt;/b&gt;");
        assert_eq!(body["price"], 497);
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let mut body = json!({"review": "Fish & chips were \"great\""});
        sanitize_value(&mut body);
        assert_eq!(body["review"], "Fish & chips were \"great\"");
    }
}
