//! 账户服务 - 注册、登录、会话和地址簿
//!
//! Passwords are stored and compared as plain text; the store is a local
//! cache and there is no server to authenticate against.

use shared::models::{Address, AddressInput, RegisterInput, User, UserRole};
use shared::util::new_id;

use crate::auth::gate::{self, Access};
use crate::auth::{CurrentUser, permissions};
use crate::core::StorefrontState;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

pub const DEFAULT_ADDRESS_LABEL: &str = "Casa";
pub const DEFAULT_CITY: &str = "Volpony City";

/// Profile fields a user may change on their own record
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub whatsapp_number: Option<String>,
    pub password: Option<String>,
}

impl StorefrontState {
    /// Create a customer account and sign it in
    pub async fn register(&self, input: RegisterInput) -> AppResult<User> {
        validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        validate_required_text(&input.username, "username", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.password, "password", MAX_PASSWORD_LEN)?;
        validate_required_text(&input.whatsapp_number, "whatsappNumber", MAX_SHORT_TEXT_LEN)?;

        let mut users = self.users();
        if users.iter().any(|u| u.username == input.username) {
            return Err(AppError::new(ErrorCode::UsernameTaken)
                .with_detail("username", input.username));
        }

        let user = User {
            id: new_id(),
            name: input.name,
            username: input.username,
            password: input.password,
            role: UserRole::Customer,
            whatsapp_number: Some(input.whatsapp_number),
            addresses: None,
            restaurant_id: None,
            courier_restaurant_ids: None,
        };
        users.push(user.clone());
        self.commit_users(users).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Customer registered");

        self.remember_session(&user).await;
        Ok(user)
    }

    /// Username + password match against the cached users
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .users()
            .into_iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or_else(|| {
                tracing::debug!(username, "Login rejected");
                AppError::invalid_credentials()
            })?;
        tracing::info!(user_id = %user.id, role = %user.role, "User signed in");
        self.remember_session(&user).await;
        Ok(user)
    }

    pub async fn logout(&self) {
        if let Err(e) = self.store().clear_session().await {
            tracing::warn!(error = %e, "Failed to clear session marker");
        }
    }

    /// Resolve the stored session against the current user list.
    /// A stale or unreadable marker leaves the visitor anonymous.
    pub async fn restore_session(&self) -> Option<User> {
        let stored = match self.store().get_session().await {
            Ok(stored) => stored?,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session marker");
                return None;
            }
        };
        match self.user(&stored.id) {
            Some(user) => Some(user),
            None => {
                tracing::info!(user_id = %stored.id, "Session user no longer exists");
                self.logout().await;
                None
            }
        }
    }

    /// Session is a cache: failing to write it does not fail the sign-in
    async fn remember_session(&self, user: &User) {
        if let Err(e) = self.store().save_session(user).await {
            tracing::warn!(user_id = %user.id, error = %e, "Failed to save session marker");
        }
    }

    // ========== Address book ==========

    /// Append an address; the first one becomes the default
    pub async fn add_address(
        &self,
        actor: Option<&CurrentUser>,
        user_id: &str,
        input: AddressInput,
    ) -> AppResult<User> {
        validate_required_text(&input.street, "street", MAX_ADDRESS_LEN)?;
        validate_required_text(&input.number, "number", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.neighborhood, "neighborhood", MAX_ADDRESS_LEN)?;
        validate_optional_text(&input.city, "city", MAX_ADDRESS_LEN)?;
        validate_optional_text(&input.complement, "complement", MAX_ADDRESS_LEN)?;

        self.edit_own_user(actor, user_id, permissions::ADDRESSES_MANAGE, |user| {
            let addresses = user.addresses.get_or_insert_with(Vec::new);
            let address = Address {
                id: new_id(),
                label: non_blank(input.label).unwrap_or_else(|| DEFAULT_ADDRESS_LABEL.into()),
                street: input.street,
                number: input.number,
                neighborhood: input.neighborhood,
                city: non_blank(input.city).unwrap_or_else(|| DEFAULT_CITY.into()),
                complement: non_blank(input.complement),
                is_default: Some(addresses.is_empty()),
            };
            addresses.push(address);
            Ok(())
        })
        .await
    }

    pub async fn delete_address(
        &self,
        actor: Option<&CurrentUser>,
        user_id: &str,
        address_id: &str,
    ) -> AppResult<User> {
        self.edit_own_user(actor, user_id, permissions::ADDRESSES_MANAGE, |user| {
            let addresses = user.addresses.get_or_insert_with(Vec::new);
            let before = addresses.len();
            addresses.retain(|a| a.id != address_id);
            if addresses.len() == before {
                return Err(AppError::new(ErrorCode::AddressNotFound)
                    .with_detail("addressId", address_id));
            }
            Ok(())
        })
        .await
    }

    pub async fn update_profile(
        &self,
        actor: Option<&CurrentUser>,
        user_id: &str,
        update: ProfileUpdate,
    ) -> AppResult<User> {
        if let Some(name) = &update.name {
            validate_required_text(name, "name", MAX_NAME_LEN)?;
        }
        if let Some(password) = &update.password {
            validate_required_text(password, "password", MAX_PASSWORD_LEN)?;
        }
        validate_optional_text(&update.whatsapp_number, "whatsappNumber", MAX_SHORT_TEXT_LEN)?;

        self.edit_own_user(actor, user_id, permissions::PROFILE_UPDATE, |user| {
            if let Some(name) = update.name {
                user.name = name;
            }
            if let Some(whatsapp) = update.whatsapp_number {
                user.whatsapp_number = non_blank(Some(whatsapp));
            }
            if let Some(password) = update.password {
                user.password = password;
            }
            Ok(())
        })
        .await
    }

    /// Load → check → edit → save a single user record
    async fn edit_own_user<F>(
        &self,
        actor: Option<&CurrentUser>,
        user_id: &str,
        action: &str,
        edit: F,
    ) -> AppResult<User>
    where
        F: FnOnce(&mut User) -> AppResult<()>,
    {
        gate::require_permission(actor, action)?;
        let mut users = self.users();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound).with_detail("userId", user_id))?;
        if gate::user_access(actor, user) != Access::ReadWrite {
            return Err(AppError::permission_denied("Cannot edit another user's record")
                .with_detail("userId", user_id));
        }

        edit(user)?;
        let updated = user.clone();
        self.commit_users(users).await?;
        tracing::debug!(user_id, action, "User record updated");
        Ok(updated)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::memory_state;

    fn register_input(username: &str) -> RegisterInput {
        RegisterInput {
            name: "Ana".into(),
            username: username.into(),
            password: "segredo".into(),
            whatsapp_number: "5588999990000".into(),
        }
    }

    fn address_input(street: &str) -> AddressInput {
        AddressInput {
            label: None,
            street: street.into(),
            number: "10".into(),
            neighborhood: "Centro".into(),
            city: None,
            complement: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = memory_state().await;
        let user = state.register(register_input("ana")).await.unwrap();
        assert_eq!(user.role, UserRole::Customer);
        assert_eq!(state.users().len(), 2);

        let restored = state.restore_session().await.unwrap();
        assert_eq!(restored.id, user.id);

        state.logout().await;
        assert!(state.restore_session().await.is_none());

        let logged = state.login("ana", "segredo").await.unwrap();
        assert_eq!(logged.id, user.id);
        let err = state.login("ana", "errada").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_register_validation() {
        let state = memory_state().await;
        let mut input = register_input("ana");
        input.whatsapp_number = " ".into();
        let err = state.register(input).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);

        let err = state.register(register_input("admin")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UsernameTaken);
        // nothing saved
        assert_eq!(state.users().len(), 1);
    }

    #[tokio::test]
    async fn test_stale_session_is_dropped() {
        let state = memory_state().await;
        let user = state.register(register_input("ana")).await.unwrap();
        let users: Vec<User> = state.users().into_iter().filter(|u| u.id != user.id).collect();
        state.commit_users(users).await.unwrap();

        assert!(state.restore_session().await.is_none());
        assert!(state.store().get_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_address_book() {
        let state = memory_state().await;
        let user = state.register(register_input("ana")).await.unwrap();
        let me = CurrentUser::from(&user);

        let user = state
            .add_address(Some(&me), &user.id, address_input("Rua A"))
            .await
            .unwrap();
        let user = state
            .add_address(Some(&me), &user.id, address_input("Rua B"))
            .await
            .unwrap();
        let book = user.addresses();
        assert_eq!(book.len(), 2);
        assert!(book[0].is_default());
        assert!(!book[1].is_default());
        assert_eq!(book[0].label, DEFAULT_ADDRESS_LABEL);
        assert_eq!(book[0].city, DEFAULT_CITY);

        let first = book[0].id.clone();
        let user = state.delete_address(Some(&me), &user.id, &first).await.unwrap();
        assert_eq!(user.addresses().len(), 1);

        let err = state
            .delete_address(Some(&me), &user.id, &first)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AddressNotFound);
    }

    #[tokio::test]
    async fn test_cannot_edit_someone_else() {
        let state = memory_state().await;
        let ana = state.register(register_input("ana")).await.unwrap();
        let bia = state.register(register_input("bia")).await.unwrap();
        let as_bia = CurrentUser::from(&bia);

        let err = state
            .add_address(Some(&as_bia), &ana.id, address_input("Rua A"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::PermissionDenied);

        let err = state
            .add_address(None, &ana.id, address_input("Rua A"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_update_profile() {
        let state = memory_state().await;
        let ana = state.register(register_input("ana")).await.unwrap();
        let me = CurrentUser::from(&ana);
        let updated = state
            .update_profile(
                Some(&me),
                &ana.id,
                ProfileUpdate {
                    name: Some("Ana Maria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(state.user(&ana.id).unwrap().name, "Ana Maria");
    }
}
