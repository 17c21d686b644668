// src/utils.rs
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use governor::{RateLimiter, clock::DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use log::error;
use std::net::IpAddr;
use std::fmt;

pub type IpRateLimiter = RateLimiter<IpAddr, DefaultKeyedStateStore<IpAddr>, DefaultClock>;

#[derive(Debug)]
pub enum RequestError {
    MissingPeerIP,
    RateLimitExceeded,
    UnknownTarget(String),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPeerIP => write!(f, "Failed to extract client IP"),
            Self::RateLimitExceeded => write!(f, "Rate limit exceeded"),
            Self::UnknownTarget(target) => write!(f, "Unknown server: {}", target),
        }
    }
}

impl ResponseError for RequestError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::RateLimitExceeded => {
                HttpResponse::TooManyRequests().body(self.to_string())
            }
            Self::UnknownTarget(_) => {
                HttpResponse::NotFound().body(self.to_string())
            }
            Self::MissingPeerIP => HttpResponse::BadRequest().body(self.to_string()),
        }
    }
}

pub fn extract_peer_ip(req: &HttpRequest) -> Result<IpAddr, RequestError> {
    req.peer_addr()
        .map(|addr| addr.ip())
        .ok_or(RequestError::MissingPeerIP)
}

/// Resolves the caller's IP and charges one request against its quota.
pub fn check_rate_limit(req: &HttpRequest, rate_limiter: &IpRateLimiter) -> Result<IpAddr, RequestError> {
    let peer_ip = extract_peer_ip(req)?;

    if rate_limiter.check_key(&peer_ip).is_err() {
        error!("Rate limit exceeded for status request from ip: {}", peer_ip);
        return Err(RequestError::RateLimitExceeded);
    }

    Ok(peer_ip)
}
