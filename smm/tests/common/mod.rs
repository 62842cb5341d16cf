#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use smm::{
    api::{ApiClient, schedule::ScheduleApi, submissions::SubmissionApi, twitter::TwitterApi},
    error::{AppError, AppResult},
    models::*,
    session::Session,
    store::{KeyValueStore, MemoryStore},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    task::JoinHandle,
};

// ---------------------------------------------------------------------------
// Canned HTTP backend

pub struct CannedResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl CannedResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
        }
    }

    pub fn empty(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            headers: vec![],
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    fn to_http(&self) -> String {
        let mut head = format!("HTTP/1.1 {} Canned\r\n", self.status);
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");
        head + &self.body
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Answers each incoming connection with the next canned response.
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    _task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(responses: Vec<CannedResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);

        let task = tokio::spawn(async move {
            let mut responses = responses.into_iter();
            while let Ok((mut stream, _)) = listener.accept().await {
                let Some(request) = read_request(&mut stream).await else {
                    continue;
                };
                recorded.lock().unwrap().push(request);

                let response = responses.next().unwrap_or_else(|| {
                    CannedResponse::json(500, json!({ "error": "no canned response left" }))
                });
                let _ = stream.write_all(response.to_http().as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            requests,
            _task: task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..read]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    while buffer.len() < head_end + content_length {
        let read = stream.read(&mut chunk).await.ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..read]);
    }

    let body_end = buffer.len().min(head_end + content_length);
    let body = String::from_utf8_lossy(&buffer[head_end..body_end]).to_string();

    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

pub fn memory_session() -> Session {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    Session::new(store)
}

pub fn client_for(server_url: &str, session: Session) -> ApiClient {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    ApiClient::with_client(client, server_url, session)
}

/// Base URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api")
}

// ---------------------------------------------------------------------------
// Fixtures

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

pub fn user(id: i64, username: &str, account_type: AccountType) -> User {
    User {
        id,
        username: username.to_string(),
        email: format!("{username}@example.com"),
        account_type,
        created_at: None,
    }
}

pub fn scheduled_post(id: i64, status: PostStatus, scheduled_time: DateTime<Utc>) -> ScheduledPost {
    ScheduledPost {
        id,
        platform: Platform::Twitter,
        platform_account_id: 1,
        target_id: String::new(),
        content: format!("post {id}"),
        scheduled_time,
        status,
        posted_time: None,
        error_message: None,
    }
}

pub fn submission(id: i64, platform: Platform, status: SubmissionStatus) -> Submission {
    Submission {
        id,
        platform,
        target_id: if platform == Platform::Twitter {
            String::new()
        } else {
            "chat-1".to_string()
        },
        content: format!("submission {id}"),
        submission_time: at(2026, 10, 15, 9, 0),
        scheduled_time: None,
        status,
        review_time: None,
        rejection_reason: None,
        submitter_username: "sub".to_string(),
        admin_username: None,
    }
}

pub fn tweet(id: &str, text: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: text.to_string(),
        ..Tweet::default()
    }
}

pub fn account(id: i64, username: &str, connected_at: Option<DateTime<Utc>>) -> PlatformAccount {
    PlatformAccount {
        id,
        platform: Some(Platform::Twitter),
        username: Some(username.to_string()),
        telegram_id: None,
        user_id: Some(1),
        connected_at,
    }
}

fn api_error(status: u16, message: &str) -> AppError {
    AppError::Api {
        status,
        message: message.to_string(),
        retry_after_seconds: None,
    }
}

// ---------------------------------------------------------------------------
// Trait-level fakes

#[derive(Default)]
pub struct FakeTwitter {
    pub timeline: Vec<Tweet>,
    pub fail_post: bool,
    pub fail_connect: bool,
    pub timeline_calls: Mutex<u32>,
    pub posted: Mutex<Vec<(i64, String)>>,
    pub connect_requests: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl TwitterApi for FakeTwitter {
    async fn get_accounts(&self) -> AppResult<Vec<PlatformAccount>> {
        Ok(vec![account(1, "main", None)])
    }

    async fn connect(&self, request: &TwitterConnectRequest) -> AppResult<PlatformAccount> {
        self.connect_requests.lock().unwrap().push((
            request.code.clone(),
            request.redirect_uri.clone(),
            request.code_verifier.clone(),
        ));
        if self.fail_connect {
            return Err(api_error(400, "invalid authorization code"));
        }
        Ok(account(7, "connected", None))
    }

    async fn delete_account(&self, _account_id: i64) -> AppResult<()> {
        Ok(())
    }

    async fn post_tweet(&self, account_id: i64, content: &str) -> AppResult<Tweet> {
        self.posted
            .lock()
            .unwrap()
            .push((account_id, content.to_string()));
        if self.fail_post {
            return Err(api_error(500, "Twitter is down"));
        }
        Ok(tweet("99", content))
    }

    async fn get_timeline(&self, _account_id: i64, count: u32) -> AppResult<Vec<Tweet>> {
        *self.timeline_calls.lock().unwrap() += 1;
        Ok(self.timeline.iter().take(count as usize).cloned().collect())
    }

    async fn get_analytics(
        &self,
        _account_id: i64,
        _time_range: TimeRange,
    ) -> AppResult<TwitterAnalytics> {
        Ok(TwitterAnalytics::default())
    }
}

#[derive(Default)]
pub struct FakeSubmissions {
    pub fail_review: bool,
    pub reviews: Mutex<Vec<(i64, ReviewAction, Option<String>)>>,
    pub updates: Mutex<Vec<(i64, Option<String>)>>,
}

#[async_trait]
impl SubmissionApi for FakeSubmissions {
    async fn get_submissions(&self, _status: Option<SubmissionStatus>) -> AppResult<Vec<Submission>> {
        Ok(vec![])
    }

    async fn get_submission(&self, id: i64) -> AppResult<Submission> {
        Ok(submission(id, Platform::Twitter, SubmissionStatus::Pending))
    }

    async fn create_submission(&self, _submission: &NewSubmission) -> AppResult<Submission> {
        Ok(submission(1, Platform::Twitter, SubmissionStatus::Pending))
    }

    async fn update_submission(
        &self,
        id: i64,
        changeset: &SubmissionChangeset,
    ) -> AppResult<Submission> {
        self.updates
            .lock()
            .unwrap()
            .push((id, changeset.content.clone()));
        let mut updated = submission(id, Platform::Twitter, SubmissionStatus::Pending);
        if let Some(content) = &changeset.content {
            updated.content = content.clone();
        }
        Ok(updated)
    }

    async fn review_submission(&self, id: i64, review: &ReviewRequest) -> AppResult<Submission> {
        self.reviews
            .lock()
            .unwrap()
            .push((id, review.action, review.rejection_reason.clone()));
        if self.fail_review {
            return Err(api_error(500, "could not record review"));
        }
        let status = match review.action {
            ReviewAction::Approve => SubmissionStatus::Approved,
            ReviewAction::Reject => SubmissionStatus::Rejected,
        };
        Ok(submission(id, Platform::Twitter, status))
    }
}

/// In-memory scheduler that counts list reloads.
#[derive(Default)]
pub struct FakeSchedule {
    pub posts: Mutex<Vec<ScheduledPost>>,
    pub list_calls: Mutex<u32>,
    pub created: Mutex<Vec<NewScheduledPost>>,
    pub deleted: Mutex<Vec<i64>>,
}

impl FakeSchedule {
    pub fn with_posts(posts: Vec<ScheduledPost>) -> Self {
        Self {
            posts: Mutex::new(posts),
            ..Self::default()
        }
    }

    pub fn list_calls(&self) -> u32 {
        *self.list_calls.lock().unwrap()
    }
}

#[async_trait]
impl ScheduleApi for FakeSchedule {
    async fn get_scheduled_posts(&self, status: Option<PostStatus>) -> AppResult<Vec<ScheduledPost>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| status.is_none_or(|s| post.status == s))
            .cloned()
            .collect())
    }

    async fn get_scheduled_post(&self, id: i64) -> AppResult<ScheduledPost> {
        self.posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| api_error(404, "Scheduled post not found"))
    }

    async fn create_scheduled_post(&self, post: &NewScheduledPost) -> AppResult<ScheduledPost> {
        self.created.lock().unwrap().push(post.clone());
        let mut posts = self.posts.lock().unwrap();
        let id = posts.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let created = ScheduledPost {
            id,
            platform: post.platform,
            platform_account_id: post.platform_account_id,
            target_id: post.target_id.clone(),
            content: post.content.clone(),
            scheduled_time: post.scheduled_time,
            status: PostStatus::Scheduled,
            posted_time: None,
            error_message: None,
        };
        posts.push(created.clone());
        Ok(created)
    }

    async fn update_scheduled_post(
        &self,
        id: i64,
        changeset: &ScheduledPostChangeset,
    ) -> AppResult<ScheduledPost> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(|| api_error(404, "Scheduled post not found"))?;
        if let Some(content) = &changeset.content {
            post.content = content.clone();
        }
        if let Some(scheduled_time) = changeset.scheduled_time {
            post.scheduled_time = scheduled_time;
        }
        Ok(post.clone())
    }

    async fn delete_scheduled_post(&self, id: i64) -> AppResult<()> {
        self.deleted.lock().unwrap().push(id);
        self.posts.lock().unwrap().retain(|post| post.id != id);
        Ok(())
    }
}
