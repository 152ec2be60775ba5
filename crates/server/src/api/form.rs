//! Form parameters sent either url-encoded or as multipart.
//!
//! qBittorrent clients disagree on the encoding of POST bodies, so handlers
//! take a flat name/value map instead of a typed form.

use std::collections::HashMap;

use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

use super::ApiError;

/// Text fields of a POST body. File parts are ignored.
#[derive(Debug, Default)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
    /// Value of a field, `None` if absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed value of a field, `None` if absent or blank.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).map(str::trim).filter(|v| !v.is_empty())
    }

    /// qBittorrent booleans are the literal strings "true"/"false".
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some(v) if v.eq_ignore_ascii_case("true"))
    }
}

impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;

            let mut fields = HashMap::new();
            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?
            {
                let Some(name) = field.name().map(str::to_string) else {
                    continue;
                };
                if field.file_name().is_some() {
                    continue;
                }
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(e.body_text()))?;
                fields.insert(name, value);
            }
            return Ok(Self(fields));
        }

        if content_type.is_empty() {
            return Ok(Self::default());
        }

        let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        Ok(Self(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(content_type: Option<&str>, body: &str) -> Result<FormFields, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        FormFields::from_request(request, &()).await
    }

    #[tokio::test]
    async fn test_urlencoded() {
        let fields = extract(
            Some("application/x-www-form-urlencoded"),
            "hashes=abc%7Cdef&deleteFiles=true",
        )
        .await
        .unwrap();

        assert_eq!(fields.get("hashes"), Some("abc|def"));
        assert!(fields.flag("deleteFiles"));
        assert!(!fields.flag("missing"));
    }

    #[tokio::test]
    async fn test_multipart() {
        let body = "--XYZ\r\n\
                    Content-Disposition: form-data; name=\"urls\"\r\n\r\n\
                    magnet:?xt=urn:btih:abc\r\n\
                    --XYZ\r\n\
                    Content-Disposition: form-data; name=\"category\"\r\n\r\n\
                    tv\r\n\
                    --XYZ--\r\n";

        let fields = extract(Some("multipart/form-data; boundary=XYZ"), body)
            .await
            .unwrap();

        assert_eq!(fields.get("urls"), Some("magnet:?xt=urn:btih:abc"));
        assert_eq!(fields.get("category"), Some("tv"));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_empty() {
        let fields = extract(None, "").await.unwrap();
        assert!(fields.get("hashes").is_none());
    }

    #[tokio::test]
    async fn test_non_empty_trims() {
        let fields = extract(
            Some("application/x-www-form-urlencoded"),
            "category=+++&savePath=%20/data%20",
        )
        .await
        .unwrap();

        assert_eq!(fields.non_empty("category"), None);
        assert_eq!(fields.non_empty("savePath"), Some("/data"));
    }
}
