// src/handlers/servers.rs
use actix_web::{web, HttpResponse, HttpRequest};
use log::debug;
use crate::storage::memory::StatusStorage;
use crate::utils::{check_rate_limit, IpRateLimiter, RequestError};

pub async fn get_servers(
    storage: web::Data<StatusStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let snapshots = storage.get_all();
    debug!("Building server list response with {} servers", snapshots.len());

    Ok(HttpResponse::Ok().json(snapshots))
}

pub async fn get_summary(
    storage: web::Data<StatusStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let body = storage
        .get_all()
        .iter()
        .map(|snapshot| snapshot.summary() + "\n")
        .collect::<String>();

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body))
}

pub async fn get_server(
    storage: web::Data<StatusStorage>,
    rate_limiter: web::Data<IpRateLimiter>,
    target: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, RequestError> {
    check_rate_limit(&req, &rate_limiter)?;

    let target = target.into_inner();
    match storage.get(&target) {
        Some(snapshot) => Ok(HttpResponse::Ok().json(snapshot)),
        None => Err(RequestError::UnknownTarget(target)),
    }
}
