use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use shared::errors::ServiceError;
use validator::{Validate, ValidationErrors};

/// JSON body that is rejected with 400 unless it passes `validator` rules.
///
/// The rejection carries the usual `{status, message}` envelope plus a
/// `details` object keyed by field, which the admin panel renders inline.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                (
                    rejection.status(),
                    Json(json!({ "status": "error", "message": rejection.body_text() })),
                )
            })?;

        if let Err(errors) = body.validate() {
            let summary = match ServiceError::from(errors.clone()) {
                ServiceError::Validation(messages) if !messages.is_empty() => messages.join("; "),
                _ => "Validation failed".to_string(),
            };

            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "status": "error",
                    "message": summary,
                    "details": field_messages(&errors),
                })),
            ));
        }

        Ok(Self(body))
    }
}

fn field_messages(errors: &ValidationErrors) -> Value {
    let details: Map<String, Value> = errors
        .field_errors()
        .into_iter()
        .map(|(field, field_errors)| {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid {field}"),
                })
                .collect();
            (field.to_string(), json!(messages))
        })
        .collect();

    Value::Object(details)
}
