//! Shared fixtures for the persistence tests.

#![allow(dead_code)]

use quire_db::models::article::{Article, CreateArticle};
use quire_db::models::review_submission::{ReviewRequest, SubmitEdit};
use quire_db::models::user::CreateUser;
use quire_db::repositories::UserRepo;
use quire_db::workflow::ArticleWorkflow;
use sqlx::PgPool;

pub async fn user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            display_name: None,
        },
    )
    .await
    .unwrap()
    .id
}

pub fn new_article(content: &str, review_required: bool) -> CreateArticle {
    CreateArticle {
        title: "Getting started".to_string(),
        module_id: 1,
        content: content.to_string(),
        commit_message: None,
        tags: vec!["Guide".to_string(), "guide".to_string()],
        review_required: Some(review_required),
    }
}

pub async fn article(pool: &PgPool, author: i64, content: &str, review_required: bool) -> Article {
    ArticleWorkflow::create(pool, &new_article(content, review_required), author)
        .await
        .unwrap()
        .0
}

pub fn edit(content: &str, base_version_id: Option<i64>) -> SubmitEdit {
    SubmitEdit {
        content: content.to_string(),
        commit_message: None,
        base_version_id,
    }
}

pub fn approve(merged_content: Option<&str>) -> ReviewRequest {
    ReviewRequest {
        action: "approve".to_string(),
        notes: None,
        merged_content: merged_content.map(str::to_string),
    }
}

pub fn reject(notes: &str) -> ReviewRequest {
    ReviewRequest {
        action: "reject".to_string(),
        notes: Some(notes.to_string()),
        merged_content: None,
    }
}

/// Assert the head points at a published version of the same article and
/// return its content.
pub async fn head_content(pool: &PgPool, article_id: i64) -> String {
    let (status, owner, content): (String, i64, String) = sqlx::query_as(
        "SELECT v.status, v.article_id, v.content
         FROM articles a JOIN article_versions v ON v.id = a.current_version_id
         WHERE a.id = $1",
    )
    .bind(article_id)
    .fetch_one(pool)
    .await
    .unwrap();
    assert_eq!(status, "published");
    assert_eq!(owner, article_id);
    content
}

pub async fn version_numbers(pool: &PgPool, article_id: i64) -> Vec<i32> {
    sqlx::query_scalar(
        "SELECT version_number FROM article_versions WHERE article_id = $1 ORDER BY version_number",
    )
    .bind(article_id)
    .fetch_all(pool)
    .await
    .unwrap()
}
