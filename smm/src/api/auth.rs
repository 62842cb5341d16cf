use async_trait::async_trait;
use log::info;
use reqwest::Method;

use super::ApiClient;
use crate::{
    error::AppResult,
    models::{
        AccountType, AccountTypeRequest, ChangePasswordRequest, ListEnvelope, LoginRequest,
        LoginResponse, NewSubaccount, ProfileChangeset, RegisterRequest, RegisterResponse, User,
        UserEnvelope,
    },
    session::Session,
};

#[async_trait]
pub trait AuthApi {
    fn session(&self) -> &Session;

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterResponse>;
    /// Exchanges credentials for a token and starts the local session.
    async fn login(&self, username: &str, password: &str) -> AppResult<User>;
    async fn update_profile(&self, changeset: &ProfileChangeset) -> AppResult<User>;
    async fn change_password(&self, current_password: &str, new_password: &str) -> AppResult<()>;
    async fn update_account_type(&self, account_type: AccountType) -> AppResult<User>;
    async fn get_subaccounts(&self) -> AppResult<Vec<User>>;
    async fn create_subaccount(&self, subaccount: &NewSubaccount) -> AppResult<User>;
    async fn delete_subaccount(&self, id: i64) -> AppResult<()>;

    fn logout(&self) -> AppResult<()> {
        self.session().clear()
    }

    fn current_user(&self) -> Option<User> {
        self.session().current_user()
    }

    fn is_logged_in(&self) -> bool {
        self.session().is_logged_in()
    }
}

#[async_trait]
impl AuthApi for ApiClient {
    fn session(&self) -> &Session {
        ApiClient::session(self)
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<RegisterResponse> {
        self.send_json(Method::POST, "/auth/register", request).await
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.send_json(Method::POST, "/auth/login", &request).await?;

        ApiClient::session(self).start(&response.token, &response.user)?;
        info!("logged in as {} ({})", response.user.username, response.user.account_type);

        Ok(response.user)
    }

    async fn update_profile(&self, changeset: &ProfileChangeset) -> AppResult<User> {
        let envelope: UserEnvelope = self.send_json(Method::PUT, "/auth/profile", changeset).await?;
        let user = envelope.into_user();
        ApiClient::session(self).update_user(&user)?;
        Ok(user)
    }

    async fn change_password(&self, current_password: &str, new_password: &str) -> AppResult<()> {
        let request = ChangePasswordRequest {
            current_password: current_password.to_string(),
            new_password: new_password.to_string(),
        };
        self.send_json_unit(Method::PUT, "/auth/change-password", &request)
            .await
    }

    async fn update_account_type(&self, account_type: AccountType) -> AppResult<User> {
        let request = AccountTypeRequest { account_type };
        let envelope: UserEnvelope = self
            .send_json(Method::PUT, "/auth/account-type", &request)
            .await?;
        let user = envelope.into_user();
        ApiClient::session(self).update_user(&user)?;
        Ok(user)
    }

    async fn get_subaccounts(&self) -> AppResult<Vec<User>> {
        let subaccounts: ListEnvelope<User> = self.get("/auth/subaccounts", &[]).await?;
        Ok(subaccounts.into_vec())
    }

    async fn create_subaccount(&self, subaccount: &NewSubaccount) -> AppResult<User> {
        let envelope: UserEnvelope = self
            .send_json(Method::POST, "/auth/subaccounts", subaccount)
            .await?;
        Ok(envelope.into_user())
    }

    async fn delete_subaccount(&self, id: i64) -> AppResult<()> {
        self.delete(&format!("/auth/subaccounts/{id}")).await
    }
}
