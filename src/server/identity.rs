use async_trait::async_trait;
use axum::extract::{FromRequest, RequestParts};
use axum::http::HeaderMap;

use crate::auth::User;
use crate::error::{self, Error};

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLES_HEADER: &str = "x-user-roles";

/// Reads the caller identity from the `x-user-id` and `x-user-roles`
/// (comma separated) headers. A request without an id is refused.
pub fn identify(headers: &HeaderMap) -> Result<User, Error> {
    let id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(error::unauthorized_error)?;

    let roles = headers
        .get(USER_ROLES_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|roles| {
            roles
                .split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    Ok(User::new(id, roles))
}

#[async_trait]
impl<B> FromRequest<B> for User
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        identify(req.headers())
    }
}

#[test]
fn identity_comes_from_headers() {
    let mut headers = HeaderMap::new();
    headers.insert(USER_ID_HEADER, "admin-7".parse().unwrap());
    headers.insert(USER_ROLES_HEADER, "admin, viewer,".parse().unwrap());

    let user = identify(&headers).unwrap();
    assert_eq!(user.id, "admin-7");
    assert_eq!(user.roles, vec!["admin".to_string(), "viewer".to_string()]);

    headers.remove(USER_ROLES_HEADER);
    assert!(identify(&headers).unwrap().roles.is_empty());

    let err = identify(&HeaderMap::new()).unwrap_err();
    assert_eq!(err, error::unauthorized_error());
}
