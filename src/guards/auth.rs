use rocket::request::{self, FromRequest, Request, Outcome};
use rocket::http::Status;

// === OpenAPI (compatible with rocket_okapi 0.8.0 / 0.8.1) ===
use rocket_okapi::request::{OpenApiFromRequest, RequestHeaderInput};
use rocket_okapi::r#gen::OpenApiGenerator;

use crate::services::jwt::{JwtService, ADMIN_ROLE};

/// JWT guard admitting dashboard reviewers only.
pub struct AdminGuard {
    pub subject: String,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminGuard {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let token = match req.headers().get_one("Authorization") {
            Some(token) => token.trim_start_matches("Bearer "),
            None => return Outcome::Error((Status::Unauthorized, ())),
        };

        match JwtService::verify_token(token) {
            Ok(claims) if claims.role == ADMIN_ROLE => Outcome::Success(AdminGuard {
                subject: claims.sub,
            }),
            Ok(claims) => {
                log::warn!("Dashboard access denied for {} (role {})", claims.sub, claims.role);
                Outcome::Error((Status::Forbidden, ()))
            }
            Err(_) => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}

/// The guard doesn't contribute any special header/parameter for docs
impl<'a> OpenApiFromRequest<'a> for AdminGuard {
    fn from_request_input(
        _gen: &mut OpenApiGenerator,
        _name: String,
        _required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        Ok(RequestHeaderInput::None)
    }
}
