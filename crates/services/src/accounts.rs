//! # Accounts
//!
//! Registration, login and bearer-token authentication. New accounts are
//! granted the `member` capability so they can write articles right away.

use std::sync::Arc;

use domains::inputs::{self, LoginInput, RegisterInput};
use domains::ports::{IssuedToken, PasswordHasher, TokenIssuer, UserRepository};
use domains::{is_member, Capability, ConflictKind, DomainError, FieldError, Result, User};
use serde::Serialize;

use crate::status::StatusMessage;

const BAD_CREDENTIALS: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// A signed-in account and its bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub token: IssuedToken,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user: User,
    pub is_member: bool,
}

pub struct AccountsService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccountsService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn register(&self, input: RegisterInput) -> Result<Session> {
        let input = RegisterInput {
            username: input.username.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            ..input
        };
        let mut fields = match inputs::validate(&input) {
            Ok(()) => Vec::new(),
            Err(DomainError::Validation(fields)) => fields,
            Err(e) => return Err(e),
        };
        if input.password != input.password_confirm {
            fields.push(FieldError::new(
                "password_confirm",
                "The two password fields didn't match.",
            ));
        }
        if !fields.is_empty() {
            fields.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(DomainError::Validation(fields));
        }

        if self.users.find_user_by_username(&input.username).await?.is_some() {
            return Err(DomainError::Conflict(ConflictKind::UsernameTaken));
        }

        let hash = self.hasher.hash(&input.password)?;
        let mut user = User::new(input.username, input.email, hash);
        user.full_name = inputs::text(&input.full_name);
        user.capabilities.insert(Capability::Member);

        let user = self.users.insert_user(user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "account registered");
        let token = self.tokens.issue(user.id)?;
        Ok(Session { user, token })
    }

    /// Unknown usernames and wrong passwords fail with the same message.
    pub async fn login(&self, input: LoginInput) -> Result<Session> {
        inputs::validate(&input)?;
        let user = self
            .users
            .find_user_by_username(input.username.trim())
            .await?
            .filter(|u| self.hasher.verify(&input.password, &u.password_hash))
            .ok_or_else(|| DomainError::Unauthorized(BAD_CREDENTIALS.into()))?;

        tracing::debug!(user_id = %user.id, "login succeeded");
        let token = self.tokens.issue(user.id)?;
        Ok(Session { user, token })
    }

    pub fn profile(&self, user: &User) -> Profile {
        Profile {
            user: user.clone(),
            is_member: is_member(user),
        }
    }

    /// Resolves a bearer token to the current account.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let user_id = self.tokens.verify(token)?;
        self.users
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::Unauthorized("Invalid or expired token.".into()))
    }
}

pub fn registered_message() -> StatusMessage {
    StatusMessage::success("Welcome! Your account has been created. You can now write articles!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::ports::{MockPasswordHasher, MockTokenIssuer, MockUserRepository};
    use uuid::Uuid;

    fn register_input(password: &str, confirm: &str) -> RegisterInput {
        RegisterInput {
            username: "amina".into(),
            email: " Amina@Example.org ".into(),
            password: password.into(),
            password_confirm: confirm.into(),
            full_name: Some("Amina Nakato".into()),
        }
    }

    fn tokens() -> MockTokenIssuer {
        let mut tokens = MockTokenIssuer::new();
        tokens.expect_issue().returning(|_| {
            Ok(IssuedToken {
                token: "signed".into(),
                expires_at: Utc::now(),
            })
        });
        tokens
    }

    fn hasher() -> MockPasswordHasher {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|p| Ok(format!("hashed:{p}")));
        hasher
            .expect_verify()
            .returning(|p, h| h == format!("hashed:{p}"));
        hasher
    }

    #[tokio::test]
    async fn register_grants_member_capability() {
        let mut users = MockUserRepository::new();
        users.expect_find_user_by_username().returning(|_| Ok(None));
        users.expect_insert_user().returning(|u| Ok(u));
        let svc = AccountsService::new(Arc::new(users), Arc::new(hasher()), Arc::new(tokens()));

        let session = svc
            .register(register_input("longenough", "longenough"))
            .await
            .unwrap();
        assert!(is_member(&session.user));
        assert_eq!(session.user.email, "amina@example.org");
        assert_eq!(session.user.password_hash, "hashed:longenough");
        assert_eq!(session.token.token, "signed");
    }

    #[tokio::test]
    async fn register_reports_password_mismatch() {
        let svc = AccountsService::new(
            Arc::new(MockUserRepository::new()),
            Arc::new(hasher()),
            Arc::new(tokens()),
        );
        let err = svc
            .register(register_input("longenough", "different1"))
            .await
            .unwrap_err();
        let DomainError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "password_confirm");
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let mut users = MockUserRepository::new();
        users.expect_find_user_by_username().returning(|name| {
            Ok(Some(User::new(name.into(), "x@example.org".into(), String::new())))
        });
        users.expect_insert_user().never();
        let svc = AccountsService::new(Arc::new(users), Arc::new(hasher()), Arc::new(tokens()));

        let err = svc
            .register(register_input("longenough", "longenough"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(ConflictKind::UsernameTaken)));
    }

    #[tokio::test]
    async fn login_hides_which_credential_was_wrong() {
        let mut users = MockUserRepository::new();
        users.expect_find_user_by_username().returning(|name| {
            if name == "amina" {
                Ok(Some(User::new(
                    "amina".into(),
                    "amina@example.org".into(),
                    "hashed:secret123".into(),
                )))
            } else {
                Ok(None)
            }
        });
        let svc = AccountsService::new(Arc::new(users), Arc::new(hasher()), Arc::new(tokens()));

        let wrong_password = svc
            .login(LoginInput {
                username: "amina".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        let unknown_user = svc
            .login(LoginInput {
                username: "ghost".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());

        let ok = svc
            .login(LoginInput {
                username: "amina".into(),
                password: "secret123".into(),
            })
            .await
            .unwrap();
        assert_eq!(ok.user.username, "amina");
    }

    #[tokio::test]
    async fn authenticate_rejects_deleted_account() {
        let mut tokens = MockTokenIssuer::new();
        tokens.expect_verify().returning(|_| Ok(Uuid::now_v7()));
        let mut users = MockUserRepository::new();
        users.expect_get_user().returning(|_| Ok(None));
        let svc = AccountsService::new(Arc::new(users), Arc::new(hasher()), Arc::new(tokens));

        let err = svc.authenticate("token").await.unwrap_err();
        assert!(matches!(err, DomainError::Unauthorized(_)));
    }
}
