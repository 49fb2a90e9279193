//! Test doubles shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::SecretString;
use tokio::sync::Semaphore;

use admin_portal_core::{AdminFields, AdminId, AdminRecord, BearerToken};

use crate::api::{Ack, AdminApi, CreatedAdmin, LoginResponse};
use crate::error::ClientError;
use crate::store::{CredentialStore, MemoryStore, StoreError};

/// A call observed by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Login { email: String },
    List { token: String },
    Create { token: String, body: serde_json::Value },
    Update { token: String, id: String, body: serde_json::Value },
}

/// Scripted [`AdminApi`]: each operation pops the next queued result.
#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<ApiCall>>,
    logins: Mutex<VecDeque<Result<LoginResponse, ClientError>>>,
    lists: Mutex<VecDeque<Result<Vec<AdminRecord>, ClientError>>>,
    creates: Mutex<VecDeque<Result<CreatedAdmin, ClientError>>>,
    updates: Mutex<VecDeque<Result<Ack, ClientError>>>,
    login_gate: Mutex<Option<Arc<Semaphore>>>,
    list_gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeApi {
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn push_login(&self, result: Result<LoginResponse, ClientError>) {
        self.logins.lock().unwrap().push_back(result);
    }

    pub fn push_list(&self, result: Result<Vec<AdminRecord>, ClientError>) {
        self.lists.lock().unwrap().push_back(result);
    }

    pub fn push_create(&self, result: Result<CreatedAdmin, ClientError>) {
        self.creates.lock().unwrap().push_back(result);
    }

    pub fn push_update(&self, result: Result<Ack, ClientError>) {
        self.updates.lock().unwrap().push_back(result);
    }

    /// Make `login` wait for a permit on the returned semaphore.
    pub fn gate_login(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.login_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Make `list_admins` wait for a permit on the returned semaphore.
    pub fn gate_list(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.list_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

async fn pass(gate: Option<Arc<Semaphore>>) {
    if let Some(gate) = gate {
        gate.acquire().await.unwrap().forget();
    }
}

fn pop<T>(queue: &Mutex<VecDeque<Result<T, ClientError>>>, op: &str) -> Result<T, ClientError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| panic!("no scripted result for {op}"))
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn login(
        &self,
        email: &str,
        _password: &SecretString,
    ) -> Result<LoginResponse, ClientError> {
        self.record(ApiCall::Login {
            email: email.to_owned(),
        });
        let gate = self.login_gate.lock().unwrap().clone();
        pass(gate).await;
        pop(&self.logins, "login")
    }

    async fn list_admins(&self, token: &BearerToken) -> Result<Vec<AdminRecord>, ClientError> {
        self.record(ApiCall::List {
            token: token.expose().to_owned(),
        });
        let gate = self.list_gate.lock().unwrap().clone();
        pass(gate).await;
        pop(&self.lists, "list_admins")
    }

    async fn create_admin(
        &self,
        token: &BearerToken,
        fields: &AdminFields,
    ) -> Result<CreatedAdmin, ClientError> {
        self.record(ApiCall::Create {
            token: token.expose().to_owned(),
            body: serde_json::to_value(fields).unwrap(),
        });
        pop(&self.creates, "create_admin")
    }

    async fn update_admin(
        &self,
        token: &BearerToken,
        id: &AdminId,
        fields: &AdminFields,
    ) -> Result<Ack, ClientError> {
        self.record(ApiCall::Update {
            token: token.expose().to_owned(),
            id: id.to_string(),
            body: serde_json::to_value(fields).unwrap(),
        });
        pop(&self.updates, "update_admin")
    }
}

/// Build a login response from JSON, as the HTTP client would.
pub fn login_response(value: &serde_json::Value) -> LoginResponse {
    serde_json::from_value(value.clone()).unwrap()
}

/// Credential store that fails for every key, or only for chosen keys.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    /// Keys whose `set` fails; empty means every operation fails.
    failing: HashSet<String>,
}

impl FailingStore {
    pub fn failing_on(key: &str) -> Self {
        Self {
            inner: MemoryStore::new(),
            failing: HashSet::from([key.to_owned()]),
        }
    }

    pub const fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.is_empty() || self.failing.contains(key) {
            Err(StoreError::Unavailable(format!("{key} is not writable")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.failing.is_empty() {
            return Err(StoreError::Unavailable("store disabled".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.failing.is_empty() {
            return Err(StoreError::Unavailable("store disabled".to_string()));
        }
        self.inner.remove(key).await
    }
}
