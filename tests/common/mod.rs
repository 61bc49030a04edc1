//! Shared by every integration test binary; not all of them use every helper.
#![allow(dead_code)]

use std::net::TcpListener;

use booking_api::auth::TokenService;
use booking_api::configuration::JwtSettings;
use booking_api::startup::{run, Stores};
use reqwest::{Client, Response};
use serde_json::{json, Value};

pub struct TestApp {
    pub address: String,
    pub tokens: TokenService,
    pub client: Client,
}

/// Start the server on a random port with an in-memory store and
/// secrets unique to this test
pub async fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let jwt = JwtSettings::new(
        format!("access-{}", uuid::Uuid::new_v4()),
        format!("refresh-{}", uuid::Uuid::new_v4()),
    );
    let server = run(listener, Stores::in_memory(), &jwt).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        tokens: TokenService::new(&jwt),
        client: Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn refresh(&self, refresh_token: &str) -> Response {
        self.client
            .post(self.url("/refresh"))
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Register and log in, returning `(access_token, refresh_token)`
    pub async fn signed_in(&self, username: &str, password: &str) -> (String, String) {
        assert_eq!(200, self.register(username, password).await.status().as_u16());
        let body: Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        (
            body["access_token"].as_str().expect("No access token").to_string(),
            body["refresh_token"].as_str().expect("No refresh token").to_string(),
        )
    }

    pub async fn get_current_user(&self, access_token: &str) -> Response {
        self.client
            .get(self.url("/get_current_user"))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn create_booking(&self, access_token: &str, body: &Value) -> Response {
        self.client
            .post(self.url("/create_booking"))
            .bearer_auth(access_token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_bookings(&self, access_token: &str) -> Response {
        self.client
            .get(self.url("/get_bookings"))
            .bearer_auth(access_token)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
