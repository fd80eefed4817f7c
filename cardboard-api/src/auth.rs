use std::str::FromStr;

use chrono::Utc;
use uuid::Uuid;

use crate::{Error, Time};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct NewSession {
    pub user: String,
    pub password: String,
    pub device: String,
}

impl NewSession {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.user)?;
        crate::validate_string(&self.password)?;
        crate::validate_string(&self.device)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub initial_password_hash: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.name)?;
        crate::validate_string(&self.initial_password_hash)?;
        if self.name.is_empty() || !self.name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(Error::InvalidName(self.name.clone()));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct AuthToken(pub Uuid);

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize,
)]
pub struct UserId(pub Uuid);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
}

/// Returned for a missing, malformed, unknown or expired token alike, and for
/// sessions whose user no longer exists
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("authentication failed")]
pub struct AuthFailure;

impl From<AuthFailure> for Error {
    fn from(_: AuthFailure) -> Error {
        Error::Unauthenticated
    }
}

/// What a request presented as its credential, and when it was presented
#[derive(Clone, Debug)]
pub struct AuthContext {
    pub presented: Option<String>,
    pub now: Time,
}

impl AuthContext {
    pub fn new(presented: Option<String>) -> AuthContext {
        AuthContext {
            presented,
            now: Utc::now(),
        }
    }

    pub fn with_token(token: AuthToken) -> AuthContext {
        AuthContext::new(Some(token.0.to_string()))
    }

    pub fn token(&self) -> Result<AuthToken, AuthFailure> {
        let raw = self
            .presented
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(AuthFailure)?;
        Uuid::from_str(raw).map(AuthToken).map_err(|_| AuthFailure)
    }
}

pub trait UserDirectory {
    /// Returns the owner of `token` along with the time the session expires
    fn session(&self, token: AuthToken) -> Option<(UserId, Time)>;
    fn user(&self, id: UserId) -> Option<User>;
}

pub fn resolve_user<D: UserDirectory + ?Sized>(
    ctx: &AuthContext,
    dir: &D,
) -> Result<User, AuthFailure> {
    let token = ctx.token()?;
    let (user, expires) = dir.session(token).ok_or(AuthFailure)?;
    if expires <= ctx.now {
        return Err(AuthFailure);
    }
    dir.user(user).ok_or(AuthFailure)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;

    use super::*;

    #[derive(Default)]
    struct Dir {
        sessions: HashMap<AuthToken, (UserId, Time)>,
        users: HashMap<UserId, User>,
    }

    impl UserDirectory for Dir {
        fn session(&self, token: AuthToken) -> Option<(UserId, Time)> {
            self.sessions.get(&token).copied()
        }

        fn user(&self, id: UserId) -> Option<User> {
            self.users.get(&id).cloned()
        }
    }

    fn setup() -> (Dir, AuthToken, User) {
        let mut dir = Dir::default();
        let user = User {
            id: UserId(Uuid::new_v4()),
            name: String::from("alice"),
        };
        let tok = AuthToken(Uuid::new_v4());
        dir.sessions
            .insert(tok, (user.id, Utc::now() + Duration::hours(1)));
        dir.users.insert(user.id, user.clone());
        (dir, tok, user)
    }

    #[test]
    fn resolves_live_session() {
        let (dir, tok, user) = setup();
        assert_eq!(resolve_user(&AuthContext::with_token(tok), &dir), Ok(user));
    }

    #[test]
    fn every_failure_is_the_same() {
        let (mut dir, tok, user) = setup();
        let missing = AuthContext::new(None);
        let empty = AuthContext::new(Some(String::new()));
        let malformed = AuthContext::new(Some(String::from("not-a-uuid")));
        let unknown = AuthContext::with_token(AuthToken(Uuid::new_v4()));
        for ctx in [missing, empty, malformed, unknown] {
            assert_eq!(resolve_user(&ctx, &dir), Err(AuthFailure));
        }

        let mut expired = AuthContext::with_token(tok);
        expired.now = Utc::now() + Duration::hours(2);
        assert_eq!(resolve_user(&expired, &dir), Err(AuthFailure));

        dir.users.remove(&user.id);
        assert_eq!(
            resolve_user(&AuthContext::with_token(tok), &dir),
            Err(AuthFailure)
        );
    }

    #[test]
    fn new_user_names() {
        let mut u = NewUser {
            id: UserId(Uuid::new_v4()),
            name: String::from("alice_2"),
            initial_password_hash: String::from("hash"),
        };
        assert_eq!(u.validate(), Ok(()));
        u.name = String::from("al ice");
        assert_eq!(u.validate(), Err(Error::InvalidName(String::from("al ice"))));
        u.name = String::new();
        assert!(u.validate().is_err());
    }
}
