//! Account operations for the mock client

use super::{MockCall, MockCloudflareClient};
use crate::error::CloudflareError;
use crate::models::*;

pub async fn get_account(client: &MockCloudflareClient, id: &str) -> Result<Account, CloudflareError> {
    client.record(MockCall::GetAccount(id.to_string()));

    if let Some(err) = client.get_failure.lock().unwrap().take() {
        return Err(err);
    }

    client
        .accounts
        .lock()
        .unwrap()
        .get(id)
        .cloned()
        .ok_or_else(|| CloudflareError::NotFound(format!("Account {} not found", id)))
}

pub async fn update_account(
    client: &MockCloudflareClient,
    id: &str,
    update: &AccountUpdate,
) -> Result<Account, CloudflareError> {
    client.record(MockCall::UpdateAccount(id.to_string(), update.clone()));

    if let Some(err) = client.update_failure.lock().unwrap().take() {
        return Err(err);
    }

    let mut accounts = client.accounts.lock().unwrap();
    let account = accounts
        .get_mut(id)
        .ok_or_else(|| CloudflareError::NotFound(format!("Account {} not found", id)))?;

    account.name = update.name.clone();
    account.settings = Some(update.settings.clone());

    Ok(account.clone())
}
