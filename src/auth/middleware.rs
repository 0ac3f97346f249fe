use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::{Claims, TokenKeys};
use crate::error::AppError;

/// Routes reachable without a token. Everything else fails closed.
const PUBLIC_PATHS: &[&str] = &["/health", "/auth/signup", "/auth/signin"];

/// Identity resolution middleware: resolves a verified identity from the
/// `Authorization` header before any handler logic runs, or rejects the
/// request with the uniform 401. Verified claims are stashed in request
/// extensions for the `AuthenticatedUser` extractor.
pub struct AuthMiddleware {
    keys: TokenKeys,
}

impl AuthMiddleware {
    pub fn new(keys: TokenKeys) -> Self {
        Self { keys }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            keys: self.keys.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    keys: TokenKeys,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflights carry no credentials; the CORS layer answers them.
        if req.method() == Method::OPTIONS || PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(self.service.call(req));
        }

        match resolve_identity(&self.keys, &req) {
            Ok(claims) => {
                req.extensions_mut().insert(claims);
                Box::pin(self.service.call(req))
            }
            Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
        }
    }
}

/// Walks the resolution steps: header present, two-part `Bearer <token>`
/// shape (scheme matched case-insensitively), token verifies. Every failing
/// step yields the same `Unauthorized`; only the logs know which step it was.
fn resolve_identity(keys: &TokenKeys, req: &ServiceRequest) -> Result<Claims, AppError> {
    let raw = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            log::debug!("request to {} without authorization header", req.path());
            AppError::Unauthorized
        })?;

    let mut parts = raw.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => {
            log::debug!("authorization header is not a two-part credential");
            return Err(AppError::Unauthorized);
        }
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        log::debug!("unsupported authorization scheme {:?}", scheme);
        return Err(AppError::Unauthorized);
    }

    keys.verify(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const TEST_SECRET: &str = "middleware-test-secret-0123456789ab";

    fn keys() -> TokenKeys {
        TokenKeys::new(TEST_SECRET, 7)
    }

    fn request_with_header(value: Option<&str>) -> ServiceRequest {
        let mut req = TestRequest::get().uri("/1/tasks");
        if let Some(value) = value {
            req = req.insert_header((header::AUTHORIZATION, value));
        }
        req.to_srv_request()
    }

    #[test]
    fn test_valid_bearer_token_resolves() {
        let token = keys().issue(5).unwrap();
        let req = request_with_header(Some(&format!("Bearer {}", token)));
        let claims = resolve_identity(&keys(), &req).unwrap();
        assert_eq!(claims.sub, "5");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let token = keys().issue(5).unwrap();
        for scheme in ["bearer", "BEARER", "BeArEr"] {
            let req = request_with_header(Some(&format!("{} {}", scheme, token)));
            assert!(resolve_identity(&keys(), &req).is_ok(), "scheme {}", scheme);
        }
    }

    #[test]
    fn test_every_failure_is_the_same_unauthorized() {
        let foreign_token = TokenKeys::new("some-other-secret-some-other-sec", 7)
            .issue(5)
            .unwrap();
        let cases: Vec<Option<String>> = vec![
            None,
            Some("".to_string()),
            Some("Bearer".to_string()),
            Some("Bearer one two".to_string()),
            Some("Basic dXNlcjpwYXNz".to_string()),
            Some("Bearer not-a-jwt".to_string()),
            Some(format!("Bearer {}", foreign_token)),
        ];
        for case in cases {
            let req = request_with_header(case.as_deref());
            let result = resolve_identity(&keys(), &req);
            assert!(
                matches!(result, Err(AppError::Unauthorized)),
                "case {:?} should be rejected uniformly",
                case
            );
        }
    }
}
