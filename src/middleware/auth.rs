// src/middleware/auth.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use std::convert::Infallible;

// Token do chamador, repassado ao backend como veio.
// O serviço não valida o token: quem decide é o backend.
#[derive(Debug, Clone, Default)]
pub struct BackendToken(pub Option<String>);

impl BackendToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for BackendToken
where
    S: Send + Sync,
{
    // Sem cabeçalho (ou malformado) segue sem token
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(auth)| auth.token().to_string());

        Ok(BackendToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> BackendToken {
        let (mut parts, _) = request.into_parts();
        BackendToken::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn bearer_token_is_extracted() {
        let request = Request::builder()
            .header("Authorization", "Bearer abc.def")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), Some("abc.def"));
    }

    #[tokio::test]
    async fn missing_or_other_schemes_mean_no_token() {
        assert_eq!(extract(Request::new(())).await.as_deref(), None);

        let request = Request::builder()
            .header("Authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap();
        assert_eq!(extract(request).await.as_deref(), None);
    }
}
