//! Service and persistence tests against a real SQLite file.

use linkboard::config::Config;
use linkboard::db::Store;
use linkboard::db::repositories::{CommentRepository, PostRepository, UserRepository, VoteRepository};
use linkboard::models::ValidationError;
use linkboard::services::{AuthError, PostError};
use linkboard::state::SharedState;
use std::sync::Arc;

async fn spawn_state() -> SharedState {
    spawn_state_with_pool(4).await
}

async fn spawn_state_with_pool(max_connections: u32) -> SharedState {
    let db_path =
        std::env::temp_dir().join(format!("linkboard-store-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.database.url = format!("sqlite:{}", db_path.display());
    config.database.max_connections = max_connections;
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;

    let store = Store::from_config(&config.database)
        .await
        .expect("failed to open store");
    SharedState::with_store(config, store)
}

async fn seed_user(state: &SharedState, name: &str) -> i32 {
    state
        .auth_service
        .create_user(name, &format!("{name}@example.com"), "secret")
        .await
        .expect("create user")
}

#[tokio::test]
async fn create_user_rejects_bad_email_and_short_password() {
    let state = spawn_state().await;

    let err = state
        .auth_service
        .create_user("u1", "example.com", "secret")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Validation(ValidationError::InvalidEmail)
    ));

    let err = state
        .auth_service
        .create_user("u1", "a@b.com", "abcd")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AuthError::Validation(ValidationError::PasswordTooShort { min: 5 })
    ));

    let users = UserRepository::new(&state.store.conn)
        .find_by_email("a@b.com", 2)
        .await
        .unwrap();
    assert!(users.is_empty());
}

#[tokio::test]
async fn passwords_are_stored_hashed() {
    let state = spawn_state().await;
    let id = seed_user(&state, "carol").await;

    let rows = UserRepository::new(&state.store.conn)
        .find_by_email("carol@example.com", 2)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_ne!(rows[0].password_hash, "secret");
    assert!(rows[0].password_hash.starts_with("$argon2id$"));

    let user = state.auth_service.get_user(id).await.unwrap();
    assert_eq!(user.email, "carol@example.com");

    assert!(matches!(
        state.auth_service.get_user(id + 100).await,
        Err(AuthError::UserNotFound(missing)) if missing == id + 100
    ));
}

#[tokio::test]
async fn login_outcomes() {
    let state = spawn_state().await;
    let id = seed_user(&state, "dave").await;

    assert_eq!(
        state
            .auth_service
            .login("dave@example.com", "secret")
            .await
            .unwrap(),
        id
    );
    assert!(matches!(
        state.auth_service.login("dave@example.com", "Secret").await,
        Err(AuthError::InvalidCredentials)
    ));
    assert!(matches!(
        state.auth_service.login("erin@example.com", "secret").await,
        Err(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let state = spawn_state().await;
    seed_user(&state, "frank").await;

    let err = state
        .auth_service
        .create_user("frank2", "frank@example.com", "secret")
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::Database(_)));
}

#[tokio::test]
async fn vote_count_matches_vote_rows() {
    let state = spawn_state().await;
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;
    let posts = &state.post_service;

    let post = posts.create_post("A", "http://a.com", alice).await.unwrap();
    assert_eq!(posts.vote_count(post).await.unwrap(), 0);

    posts.upvote(post, alice).await.unwrap();
    posts.upvote(post, alice).await.unwrap();
    posts.upvote(post, bob).await.unwrap();

    assert_eq!(posts.vote_count(post).await.unwrap(), 3);
    let rows = VoteRepository::new(&state.store.conn)
        .count_for_post(post)
        .await
        .unwrap();
    assert_eq!(rows, 3);

    let listed = posts.list_posts().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].vote_count, 3);
}

#[tokio::test]
async fn deleting_a_post_only_removes_its_own_dependents() {
    let state = spawn_state().await;
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;
    let posts = &state.post_service;

    let doomed = posts.create_post("Doomed", "http://a.com", alice).await.unwrap();
    let kept = posts.create_post("Kept", "http://b.com", bob).await.unwrap();

    for post in [doomed, kept] {
        posts.upvote(post, alice).await.unwrap();
        posts.upvote(post, bob).await.unwrap();
        posts.create_comment("first", post, bob).await.unwrap();
    }

    posts.delete_post(doomed, alice).await.unwrap();

    let conn = &state.store.conn;
    assert!(PostRepository::new(conn).get(doomed).await.unwrap().is_none());
    assert_eq!(CommentRepository::new(conn).count_for_post(doomed).await.unwrap(), 0);
    assert_eq!(VoteRepository::new(conn).count_for_post(doomed).await.unwrap(), 0);

    assert!(PostRepository::new(conn).get(kept).await.unwrap().is_some());
    assert_eq!(CommentRepository::new(conn).count_for_post(kept).await.unwrap(), 1);
    assert_eq!(VoteRepository::new(conn).count_for_post(kept).await.unwrap(), 2);
}

#[tokio::test]
async fn missing_or_foreign_posts_are_not_found() {
    let state = spawn_state().await;
    let alice = seed_user(&state, "alice").await;
    let bob = seed_user(&state, "bob").await;
    let posts = &state.post_service;

    let post = posts.create_post("A", "http://a.com", alice).await.unwrap();

    assert!(matches!(
        posts.update_post(post, bob, "B").await,
        Err(PostError::NotFound(id)) if id == post
    ));
    assert!(matches!(
        posts.delete_post(404, alice).await,
        Err(PostError::NotFound(404))
    ));
    assert!(matches!(posts.get_post(404).await, Err(PostError::NotFound(404))));

    assert_eq!(posts.get_post(post).await.unwrap().post.title, "A");
}

#[tokio::test]
async fn comments_on_missing_posts_fail_and_leave_nothing_behind() {
    let state = spawn_state().await;
    let alice = seed_user(&state, "alice").await;

    let err = state
        .post_service
        .create_comment("orphan", 77, alice)
        .await
        .unwrap_err();
    assert!(matches!(err, PostError::Database(_)));

    let err = state.post_service.upvote(77, alice).await.unwrap_err();
    assert!(matches!(err, PostError::Database(_)));

    assert_eq!(
        CommentRepository::new(&state.store.conn)
            .count_for_post(77)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn dropped_session_rolls_back() {
    let state = spawn_state().await;
    let alice = seed_user(&state, "alice").await;

    {
        let mut db = state.store.session();
        assert!(!db.is_open());
        PostRepository::new(db.handle().await.unwrap())
            .insert("Draft".to_string(), "http://d.com".to_string(), alice)
            .await
            .unwrap();
        assert!(db.is_open());
    }

    let mut db = state.store.session();
    PostRepository::new(db.handle().await.unwrap())
        .insert("Discarded".to_string(), "http://e.com".to_string(), alice)
        .await
        .unwrap();
    db.rollback().await.unwrap();

    let listed = state.post_service.list_posts().await.unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn ping_reports_a_live_database() {
    let state = spawn_state().await;
    state.store.ping().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_and_upvotes_all_succeed() {
    let state = spawn_state_with_pool(20).await;
    let alice = seed_user(&state, "alice").await;
    let post = state
        .post_service
        .create_post("Busy", "http://busy.com", alice)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..40 {
        let posts = Arc::clone(&state.post_service);
        handles.push(tokio::spawn(async move {
            if i % 2 == 0 {
                posts.update_post(post, alice, &format!("Busy {i}")).await
            } else {
                posts.upvote(post, alice).await.map(|_| ())
            }
        }));
    }

    let mut failures = Vec::new();
    for handle in handles {
        if let Err(e) = handle.await.unwrap() {
            failures.push(e.to_string());
        }
    }

    assert!(
        failures.is_empty(),
        "{} of 40 writes failed, first: {:?}",
        failures.len(),
        failures.first()
    );
    assert_eq!(state.post_service.vote_count(post).await.unwrap(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_and_comments_do_not_fail_spuriously() {
    let state = spawn_state_with_pool(20).await;
    let alice = seed_user(&state, "alice").await;

    let mut ids = Vec::new();
    for i in 0..10 {
        ids.push(
            state
                .post_service
                .create_post(&format!("Post {i}"), "http://a.com", alice)
                .await
                .unwrap(),
        );
    }
    let survivor = state
        .post_service
        .create_post("Survivor", "http://b.com", alice)
        .await
        .unwrap();

    let mut handles = Vec::new();
    for id in ids {
        let posts = Arc::clone(&state.post_service);
        handles.push(tokio::spawn(async move { posts.delete_post(id, alice).await }));
        let posts = Arc::clone(&state.post_service);
        handles.push(tokio::spawn(async move {
            posts.create_comment("still here", survivor, alice).await.map(|_| ())
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let remaining = state.post_service.list_posts().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, survivor);
    assert_eq!(remaining[0].comment_count, 10);
}
