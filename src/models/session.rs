use crate::models::user::Profile;

/// The identity carried by a validated `X-Auth-Token`.
///
/// Inserted into request extensions by the auth and user-data gates. Only
/// the user id is resolved; handlers that need more join on demand.
#[derive(Clone, Copy, Debug)]
pub struct AuthSession {
    /// The ID of the user this session belongs to.
    pub user_id: i32,
}

/// The identity carried by a validated `X-Session-Token`.
///
/// The profile gate resolves the whole profile row up front, so profile
/// handlers never re-query the user.
#[derive(Clone, Debug)]
pub struct ProfileSession {
    /// The resolved profile of the session's user.
    pub profile: Profile,
}
