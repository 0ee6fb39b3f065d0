#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use directory_business::{
    Address, Company, DirectoryError, DirectoryResult, UserApi, UserId, UserRecord,
};
use tokio::time::Instant;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn user(id: u32, name: &str, company: &str) -> UserRecord {
    UserRecord {
        id: UserId::new(id).unwrap(),
        name: name.to_string(),
        username: name.split(' ').next().unwrap_or_default().to_lowercase(),
        email: format!("user{id}@example.com"),
        phone: String::new(),
        website: String::new(),
        company: Company {
            name: company.to_string(),
            catch_phrase: String::new(),
        },
        address: Address::default(),
    }
}

/// Seven users, three of them at Acme.
pub fn seven_users() -> Vec<UserRecord> {
    vec![
        user(1, "Leanne Graham", "Acme"),
        user(2, "Ervin Howell", "Globex"),
        user(3, "Clementine Bauch", "Acme"),
        user(4, "Patricia Lebsack", "Initech"),
        user(5, "Chelsey Dietrich", "Globex"),
        user(6, "Dennis Schulist", "Acme"),
        user(7, "Kurtis Weissnat", "Umbrella"),
    ]
}

pub fn users_json(users: &[UserRecord]) -> serde_json::Value {
    serde_json::to_value(users).unwrap()
}

/// `UserApi` that replays scripted outcomes and records when it was called.
///
/// Once the script runs out the last outcome repeats.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    list_outcomes: Mutex<VecDeque<DirectoryResult<Vec<UserRecord>>>>,
    user_outcomes: Mutex<VecDeque<DirectoryResult<UserRecord>>>,
    latency: Duration,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn then_list(self, outcome: DirectoryResult<Vec<UserRecord>>) -> Self {
        self.list_outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn then_user(self, outcome: DirectoryResult<UserRecord>) -> Self {
        self.user_outcomes.lock().unwrap().push_back(outcome);
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Offsets of each call from `start`.
    pub fn call_offsets(&self, start: Instant) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(start))
            .collect()
    }

    fn next<T: Clone>(queue: &Mutex<VecDeque<DirectoryResult<T>>>) -> DirectoryResult<T> {
        let mut queue = queue.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(DirectoryError::Transport("no script".to_string())))
        }
    }
}

#[async_trait]
impl UserApi for ScriptedApi {
    async fn list_users(&self) -> DirectoryResult<Vec<UserRecord>> {
        self.calls.lock().unwrap().push(Instant::now());
        tokio::time::sleep(self.latency).await;
        Self::next(&self.list_outcomes)
    }

    async fn get_user(&self, _id: UserId) -> DirectoryResult<UserRecord> {
        self.calls.lock().unwrap().push(Instant::now());
        tokio::time::sleep(self.latency).await;
        Self::next(&self.user_outcomes)
    }
}
