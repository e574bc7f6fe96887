//! 测试公共设施：内存仓储与 Blob 存储
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use halcon_auth_core::{Identity, Role, TokenService};
use halcon_common::{OrderId, UserId};
use halcon_errors::{AppError, AppResult};
use halcon_ports::{BlobStore, UploadPolicy};
use order_tracking::api::http::{AppState, HttpConfig, build_router};
use order_tracking::application::{
    AuthService, CreateOrderCommand, OrderService, OrderView, TrackingService, UserService,
};
use order_tracking::domain::order::{
    DeletionState, Order, OrderFilter, OrderRepository,
};
use order_tracking::domain::user::{HashedPassword, User, UserRepository};

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-chars-long";

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
    fail_updates: AtomicBool,
}

impl InMemoryOrderRepository {
    pub fn get(&self, id: &OrderId) -> Option<Order> {
        self.orders.lock().unwrap().get(id).cloned()
    }

    /// 之后的 update 全部返回数据库错误
    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

fn contains_ci(haystack: &str, needle: &Option<String>) -> bool {
    match needle {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.orders.lock().unwrap();
        if orders.values().any(|o| o.invoice_number == order.invoice_number) {
            return Err(AppError::conflict("invoice number already exists"));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset"));
        }
        let mut orders = self.orders.lock().unwrap();
        match orders.get_mut(&order.id) {
            Some(stored) if stored.version == order.version => {
                *stored = order.clone();
                stored.version += 1;
                Ok(())
            }
            _ => Err(AppError::conflict("order was modified concurrently")),
        }
    }

    async fn find_by_id(&self, id: &OrderId, state: DeletionState) -> AppResult<Option<Order>> {
        let deleted = state == DeletionState::Deleted;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .get(id)
            .filter(|o| o.is_deleted == deleted)
            .cloned())
    }

    async fn find_for_tracking(
        &self,
        customer_number: &str,
        invoice_number: &str,
    ) -> AppResult<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .find(|o| {
                !o.is_deleted
                    && o.customer_number == customer_number
                    && o.invoice_number == invoice_number
            })
            .cloned())
    }

    async fn list(&self, filter: &OrderFilter) -> AppResult<Vec<Order>> {
        let deleted = filter.deletion_state() == DeletionState::Deleted;
        let mut result: Vec<Order> = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.is_deleted == deleted)
            .filter(|o| contains_ci(&o.invoice_number, &filter.invoice_number))
            .filter(|o| contains_ci(&o.customer_name, &filter.customer_name))
            .filter(|o| contains_ci(&o.customer_number, &filter.customer_number))
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn exists_by_invoice_number(&self, invoice_number: &str) -> AppResult<bool> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .any(|o| o.invoice_number == invoice_number))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn get(&self, id: &UserId) -> Option<User> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AppResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::conflict("username already exists"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(id)
            .filter(|u| !u.is_deleted())
            .cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username && u.can_login())
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> AppResult<Vec<User>> {
        let users = self.users.lock().unwrap();
        Ok(ids.iter().filter_map(|id| users.get(id).cloned()).collect())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let mut users: Vec<User> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| !u.is_deleted())
            .cloned()
            .collect();
        users.sort_by(|a, b| a.audit.created_at.cmp(&b.audit.created_at));
        Ok(users)
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }

    async fn exists_with_role(&self, role: Role) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.role == role && !u.is_deleted()))
    }
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn names(&self) -> Vec<String> {
        self.blobs.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, name: &str, bytes: &[u8]) -> AppResult<String> {
        self.blobs
            .lock()
            .unwrap()
            .insert(name.to_string(), bytes.to_vec());
        Ok(format!("/uploads/{}", name))
    }

    async fn delete(&self, name: &str) -> AppResult<()> {
        self.blobs.lock().unwrap().remove(name);
        Ok(())
    }
}

/// 组装好的服务与内存依赖
pub struct TestApp {
    pub order_repo: Arc<InMemoryOrderRepository>,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub tokens: Arc<TokenService>,
    pub orders: Arc<OrderService>,
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
    pub tracking: Arc<TrackingService>,
}

impl TestApp {
    pub fn new() -> Self {
        let order_repo = Arc::new(InMemoryOrderRepository::default());
        let user_repo = Arc::new(InMemoryUserRepository::default());
        let blobs = Arc::new(InMemoryBlobStore::default());
        let tokens = Arc::new(TokenService::new(TEST_SECRET, Duration::hours(24), "halcon"));

        let orders = Arc::new(OrderService::new(
            order_repo.clone(),
            user_repo.clone(),
            blobs.clone(),
            UploadPolicy::default(),
        ));
        let users = Arc::new(UserService::new(user_repo.clone()));
        let auth = Arc::new(AuthService::new(user_repo.clone(), tokens.clone()));
        let tracking = Arc::new(TrackingService::new(order_repo.clone()));

        Self {
            order_repo,
            user_repo,
            blobs,
            tokens,
            orders,
            users,
            auth,
            tracking,
        }
    }

    /// 创建一个指定角色的员工并返回其身份
    pub async fn staff(&self, username: &str, role: Role) -> Identity {
        let user = User::new(
            username.to_string(),
            HashedPassword::from_hash("$argon2id$unused".to_string()),
            role,
            None,
        );
        self.user_repo.create(&user).await.unwrap();
        user.identity()
    }

    /// 以 Sales 身份创建订单
    pub async fn order(&self, sales: &Identity, invoice: &str, customer_number: &str) -> OrderView {
        self.orders
            .create(
                sales,
                CreateOrderCommand {
                    invoice_number: invoice.to_string(),
                    customer_name: "ACME Corp".to_string(),
                    customer_number: customer_number.to_string(),
                    delivery_address: Some("Av. Reforma 100".to_string()),
                    notes: None,
                },
            )
            .await
            .unwrap()
    }

    pub fn router(&self) -> axum::Router {
        self.router_with(&HttpConfig::default())
    }

    pub fn router_with(&self, config: &HttpConfig) -> axum::Router {
        let state = AppState {
            orders: self.orders.clone(),
            users: self.users.clone(),
            auth: self.auth.clone(),
            tracking: self.tracking.clone(),
            tokens: self.tokens.clone(),
            metrics: None,
        };
        build_router(state, config)
    }

    pub fn token_for(&self, identity: &Identity) -> String {
        self.tokens.issue(identity).unwrap()
    }
}
