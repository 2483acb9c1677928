use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};

use std::error::Error;
use std::fmt;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum ApiError {
    InvalidInput(String),
    StorageFailure(String),
}

impl Error for ApiError {}
impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::InvalidInput(what) => write!(f, "Invalid input: {}", what),
            ApiError::StorageFailure(what) => write!(f, "Storage failure: {}", what),
        }
    }
}

impl<T> From<PoisonError<T>> for ApiError {
    fn from(e: PoisonError<T>) -> ApiError {
        ApiError::StorageFailure(e.to_string())
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(e: rusqlite::Error) -> ApiError {
        ApiError::StorageFailure(e.to_string())
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = match &self {
            ApiError::InvalidInput(_) => Status::BadRequest,
            ApiError::StorageFailure(_) => Status::InternalServerError,
        };

        response::Response::build_from(self.to_string().respond_to(request)?)
            .status(status)
            .ok()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
