/// Request body extraction for the send endpoints
///
/// Bodies are decoded by content type:
/// - `application/json` (and `+json` types) through `web::Json`, so its
///   `JsonConfig` error handler applies
/// - `application/x-www-form-urlencoded` with bracketed keys, e.g.
///   `token=abc&notification[title]=Hi&tokens[0]=a`
/// - anything else is ignored and the request carries no fields
use actix_web::{dev::Payload, web, Error, FromRequest, HttpMessage, HttpRequest};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

use crate::error::AppError;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Nesting depth accepted in form keys
const FORM_MAX_DEPTH: usize = 5;

/// Decoded send request body
#[derive(Debug)]
pub struct Body<T>(pub T);

impl<T> Body<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

fn is_json(content_type: &str) -> bool {
    content_type == "application/json" || content_type.ends_with("+json")
}

impl<T> FromRequest for Body<T>
where
    T: DeserializeOwned + Default + 'static,
{
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let content_type = req.content_type().to_ascii_lowercase();

        if content_type == FORM_CONTENT_TYPE {
            let bytes = web::Bytes::from_request(req, payload);
            return Box::pin(async move {
                let bytes = bytes.await?;
                // Non-strict so percent-encoded brackets (`%5B`, `%5D`) still nest
                let value = serde_qs::Config::new(FORM_MAX_DEPTH, false)
                    .deserialize_bytes::<T>(&bytes)
                    .map_err(|e| AppError::InvalidPayload(e.to_string()))?;
                Ok::<_, Error>(Body(value))
            });
        }

        if is_json(&content_type) {
            let json = web::Json::<T>::from_request(req, payload);
            return Box::pin(async move { Ok::<_, Error>(Body(json.await?.into_inner())) });
        }

        Box::pin(async { Ok(Body(T::default())) })
    }
}
