use chrono::{DateTime, Utc};
use tonic::{Request, Response, Status};
use tracing::error;

use crate::proto;
use crate::proto::user_auth_service_server::UserAuthService;
use crate::repository::UserRepository;
use crate::service::{dto, AuthService, ServiceError};

/// gRPC handler for the `UserAuthService`.
pub struct AuthHandler<R: ?Sized> {
    service: AuthService<R>,
}

impl<R: UserRepository + ?Sized> AuthHandler<R> {
    /// Creates a handler delegating to `service`.
    pub fn new(service: AuthService<R>) -> Self {
        Self { service }
    }
}

impl From<ServiceError> for Status {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::RecordNotFound => Status::not_found("User not found"),
            ServiceError::DuplicateEntry => Status::already_exists("User already exists"),
            other => {
                error!(error = %other, "user service call failed");
                Status::internal("Internal error")
            }
        }
    }
}

fn to_timestamp(time: Option<DateTime<Utc>>) -> i64 {
    time.map_or(0, |t| t.timestamp())
}

fn from_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

impl From<proto::User> for dto::User {
    fn from(user: proto::User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            created_at: from_timestamp(user.created_at),
            updated_at: from_timestamp(user.updated_at),
        }
    }
}

impl From<dto::User> for proto::User {
    fn from(user: dto::User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password: user.password,
            created_at: to_timestamp(user.created_at),
            updated_at: to_timestamp(user.updated_at),
        }
    }
}

#[tonic::async_trait]
impl<R: UserRepository + ?Sized + 'static> UserAuthService for AuthHandler<R> {
    /// Looks a user up by id or email, optionally narrowed by password.
    ///
    /// A request with neither id nor email is rejected: empty criteria would
    /// otherwise match the lowest-id user, and a password alone must not
    /// identify an account.
    async fn find_by(&self, request: Request<proto::User>) -> Result<Response<proto::User>, Status> {
        let req = request.into_inner();

        if req.id == 0 && req.email.is_empty() {
            return Err(Status::invalid_argument("Either id or email is required"));
        }

        let user = self.service.find_by(dto::User::from(req)).await?;

        Ok(Response::new(proto::User::from(user)))
    }

    async fn store(&self, request: Request<proto::User>) -> Result<Response<proto::User>, Status> {
        let req = request.into_inner();

        if req.email.is_empty() {
            return Err(Status::invalid_argument("Email cannot be empty"));
        }

        if req.password.is_empty() {
            return Err(Status::invalid_argument("Password cannot be empty"));
        }

        let user = self.service.store(dto::User::from(req)).await?;

        Ok(Response::new(proto::User::from(user)))
    }
}
