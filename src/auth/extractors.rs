use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// The verified owner identity for the current request, normalized to its
/// canonical numeric form.
///
/// Intended for routes behind `AuthMiddleware`, which validates the token
/// and stores the claims in request extensions. A request that reaches this
/// extractor without verified claims, or whose subject does not parse as a
/// user id, gets the same uniform 401 as any other authentication failure.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i32);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .extensions()
            .get::<Claims>()
            .and_then(|claims| claims.sub.parse::<i32>().ok());

        match user_id {
            Some(id) => ready(Ok(AuthenticatedUser(id))),
            None => ready(Err(AppError::Unauthorized.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TOKEN_TYPE_ACCESS;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn claims_with_sub(sub: &str) -> Claims {
        Claims {
            sub: sub.to_string(),
            iat: 0,
            exp: 0,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
        }
    }

    #[actix_rt::test]
    async fn test_extractor_reads_verified_claims() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims_with_sub("123"));

        let mut payload = Payload::None;
        let user = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(user.id(), 123);
    }

    #[actix_rt::test]
    async fn test_extractor_without_claims_is_unauthorized() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let result = AuthenticatedUser::from_request(&req, &mut payload).await;
        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_extractor_rejects_non_numeric_subject() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims_with_sub("not-a-number"));

        let mut payload = Payload::None;
        let result = AuthenticatedUser::from_request(&req, &mut payload).await;
        let response = result.unwrap_err().error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
