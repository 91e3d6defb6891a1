#![allow(dead_code)]

use axum::Router;
use chrono::NaiveDateTime;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use courses::db;
use courses::routes::router;
use courses::state::AppState;

/// Single connection so every query sees the same in-memory database.
pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    db::init_schema(&pool).await.expect("Failed to create courses table");
    pool
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = memory_pool().await;
    let app = router(AppState { db: pool.clone() });
    (app, pool)
}

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

pub fn correct_data() -> Value {
    json!({
        "name": "Data Science",
        "start_date": "2021-06-20 18:00:00",
        "end_date": "2022-07-21 21:00:00",
        "lessons": 18
    })
}

pub fn no_field_data() -> Value {
    json!({
        "name": "Advanced Python",
        "start_date": "2021-10-20 18:00:00",
        "end_date": "2022-11-21 21:00:00"
    })
}

pub fn wrong_field_data() -> Value {
    json!({
        "name": "Big Data",
        "start_date": "2021-06-20 18:00:00",
        "end_date": "2022-07-21",
        "lessons": 18
    })
}
