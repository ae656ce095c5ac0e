use crate::core::models::common::Requester;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const UNKNOWN_ADDR: &str = "unknown";

impl FromRequest for Requester {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let ip = req.peer_addr().map(|addr| addr.ip().to_string()).unwrap_or_else(|| UNKNOWN_ADDR.to_owned());
        ready(Ok(Requester::new(ip)))
    }
}
