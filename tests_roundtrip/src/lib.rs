//! # Round-Trip Test Fixtures
//!
//! The application router used by the end-to-end suites, plus its typed
//! client façade.
//!
//! The façade shows the intended client pattern: [`client::RpcClient`]
//! provides the `call`/`call_typed` primitives, and each application
//! writes one concrete method per procedure, mirroring the shape its
//! router declares.

use client::{CallError, RpcClient};
use router::{schema, NoParams, Procedure, Router};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Echo procedure params and result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoParams {
    pub text: String,
}

/// Lookup params for `users.getById`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub id: String,
}

/// Full user record returned by `users.getById`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// Listing entry returned by `users.list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
}

/// Params for `posts.create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

/// Stored post returned by the post procedures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
}

fn user_router() -> Router {
    Router::new()
        .procedure(
            "getById",
            Procedure::builder()
                .input(schema::<UserQuery>())
                .resolve(|query: UserQuery| async move {
                    Ok(User {
                        id: query.id,
                        name: "Alice".to_string(),
                        email: "alice@example.com".to_string(),
                    })
                }),
        )
        .procedure(
            "list",
            Procedure::builder()
                .input(NoParams)
                .resolve(|_: Option<()>| async move {
                    Ok(vec![
                        UserSummary {
                            id: "11111111-1111-1111-1111-111111111111".to_string(),
                            name: "Alice".to_string(),
                        },
                        UserSummary {
                            id: "22222222-2222-2222-2222-222222222222".to_string(),
                            name: "Bob".to_string(),
                        },
                    ])
                }),
        )
}

fn post_router() -> Router {
    let next_post = Arc::new(AtomicU64::new(0));
    Router::new()
        .procedure(
            "create",
            Procedure::builder()
                .input(schema::<PostDraft>())
                .resolve(move |draft: PostDraft| {
                    let next_post = next_post.clone();
                    async move {
                        let n = next_post.fetch_add(1, Ordering::Relaxed) + 1;
                        Ok(Post {
                            id: format!("post-{}", n),
                            title: draft.title,
                            content: draft.content,
                        })
                    }
                }),
        )
        .procedure(
            "list",
            Procedure::builder()
                .input(NoParams)
                .resolve(|_: Option<()>| async move {
                    Ok(vec![Post {
                        id: "a".to_string(),
                        title: "Hello World".to_string(),
                        content: "This is a post.".to_string(),
                    }])
                }),
        )
}

/// The application router: nested user and post routers plus a
/// standalone echo procedure.
pub fn app_router() -> Router {
    Router::new()
        .nest("users", user_router())
        .nest("posts", post_router())
        .procedure(
            "echo",
            Procedure::builder()
                .input(schema::<EchoParams>())
                .resolve(|params: EchoParams| async move { Ok(params) }),
        )
}

/// Typed client for the application router, one method per procedure.
pub struct AppClient {
    inner: RpcClient,
}

impl AppClient {
    /// Wraps a connected client.
    pub fn new(inner: RpcClient) -> Self {
        Self { inner }
    }

    /// Calls `echo`.
    pub async fn echo(&self, params: &EchoParams) -> Result<EchoParams, CallError> {
        self.inner.call_typed("echo", params).await
    }

    /// Calls `users.getById`.
    pub async fn users_get_by_id(&self, query: &UserQuery) -> Result<User, CallError> {
        self.inner.call_typed("users.getById", query).await
    }

    /// Calls `users.list`.
    pub async fn users_list(&self) -> Result<Vec<UserSummary>, CallError> {
        let result = self.inner.call("users.list", None).await?;
        serde_json::from_value(result).map_err(|err| CallError::Codec(err.to_string()))
    }

    /// Calls `posts.create`.
    pub async fn posts_create(&self, draft: &PostDraft) -> Result<Post, CallError> {
        self.inner.call_typed("posts.create", draft).await
    }

    /// Calls `posts.list`.
    pub async fn posts_list(&self) -> Result<Vec<Post>, CallError> {
        let result = self.inner.call("posts.list", None).await?;
        serde_json::from_value(result).map_err(|err| CallError::Codec(err.to_string()))
    }

    /// The underlying client, for paths the façade does not cover.
    pub fn raw(&self) -> &RpcClient {
        &self.inner
    }
}
