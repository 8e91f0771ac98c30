use storefront_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        users::UpdatePhotoRequest,
    },
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    models::Role,
    services::{auth_service, dashboard_service, user_service},
    state::AppState,
};
use uuid::Uuid;

const SECRET: &str = "account-test-secret";
const PASSWORD: &str = "rahasia123";

// Registration, login, password reset, profile photo and dashboard routing.
#[tokio::test]
async fn account_lifecycle_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    register(&state, "sari", "Sari@Example.com").await?;

    // Email and username are unique.
    let dup_email = register(&state, "sari2", "sari@example.com").await;
    assert!(matches!(dup_email, Err(AppError::BadRequest(msg)) if msg == "Email sudah terdaftar."));
    let dup_username = register(&state, "sari", "other@example.com").await;
    assert!(matches!(dup_username, Err(AppError::BadRequest(msg)) if msg == "Username sudah dipakai."));

    // Login by username or email.
    let by_username = login(&state, "sari", PASSWORD).await?;
    let by_email = login(&state, "SARI@example.com", PASSWORD).await?;
    assert_eq!(by_username.user_id, by_email.user_id);
    assert_eq!(by_username.role, Role::Users);
    let unknown = login(&state, "tidakada", PASSWORD).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(msg)) if msg == "Username tidak ditemukan."));
    let wrong = login(&state, "sari", "salah12345").await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));

    // Forgot-password replies identically for unknown emails and issues nothing.
    let known = auth_service::request_password_reset(
        &state,
        ForgotPasswordRequest {
            email: "sari@example.com".into(),
        },
    )
    .await?;
    let missing = auth_service::request_password_reset(
        &state,
        ForgotPasswordRequest {
            email: "nobody@example.com".into(),
        },
    )
    .await?;
    assert_eq!(known.message, missing.message);
    assert_eq!(known.data, missing.data);

    let tokens: Vec<(String,)> = sqlx::query_as("SELECT token FROM password_resets")
        .fetch_all(&state.pool)
        .await?;
    assert_eq!(tokens.len(), 1);
    let token = tokens[0].0.clone();

    // Reset works once; the token cannot be reused.
    let short = reset(&state, &token, "pendek").await;
    assert!(matches!(short, Err(AppError::BadRequest(_))));
    reset(&state, &token, "barubaru123").await?;
    assert!(login(&state, "sari", "barubaru123").await.is_ok());
    assert!(login(&state, "sari", PASSWORD).await.is_err());
    let reused = reset(&state, &token, "lagilagi123").await;
    assert!(matches!(reused, Err(AppError::BadRequest(msg)) if msg == "Token reset tidak valid."));

    // Expired tokens are refused.
    sqlx::query(
        "INSERT INTO password_resets (token, user_id, expires_at) \
         VALUES ('expired-token', $1, now() - interval '1 minute')",
    )
    .bind(by_username.user_id)
    .execute(&state.pool)
    .await?;
    let expired = reset(&state, "expired-token", "lagilagi123").await;
    assert!(
        matches!(expired, Err(AppError::BadRequest(msg)) if msg == "Token reset sudah kedaluwarsa.")
    );
    let unknown_token = reset(&state, "no-such-token", "lagilagi123").await;
    assert!(matches!(unknown_token, Err(AppError::BadRequest(_))));

    // Photo is trimmed on update and cleared by a blank URL.
    let user = by_username;
    let updated = user_service::update_photo(
        &state,
        &user,
        UpdatePhotoRequest {
            photo_url: Some("  https://img/sari.jpg ".into()),
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(updated.photo_url.as_deref(), Some("https://img/sari.jpg"));
    let cleared = user_service::update_photo(
        &state,
        &user,
        UpdatePhotoRequest {
            photo_url: Some("   ".into()),
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(cleared.photo_url, None);
    let me = user_service::me(&state, &user).await?.data.expect("profile");
    assert_eq!(me.photo_url, None);
    assert_eq!(me.email, "sari@example.com");

    // Dashboard route follows the stored role.
    let route = dashboard_service::route(&state, &user)
        .await?
        .data
        .expect("route");
    assert_eq!(route.role, Role::Users);
    assert_eq!(route.path, "/api/dashboard/user");

    sqlx::query("UPDATE users SET role = 'admins' WHERE id = $1")
        .bind(user.user_id)
        .execute(&state.pool)
        .await?;
    let route = dashboard_service::route(&state, &user)
        .await?
        .data
        .expect("route");
    assert_eq!(route.role, Role::Admins);
    assert_eq!(route.path, "/api/dashboard/admin");
    assert!(matches!(
        dashboard_service::user_dashboard(&state, &user).await,
        Err(AppError::Forbidden)
    ));

    // A token whose user no longer exists counts as signed out.
    let ghost = AuthUser {
        user_id: Uuid::new_v4(),
        role: Role::Users,
        exp: user.exp,
    };
    assert!(matches!(
        dashboard_service::route(&state, &ghost).await,
        Err(AppError::Unauthorized(_))
    ));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    run_migrations(&pool).await?;

    sqlx::query(
        "TRUNCATE audit_logs, password_resets, cart_items, product_comments, product_likes, \
         products, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: SECRET.into(),
        token_ttl_hours: 1,
        reset_token_ttl_minutes: 60,
    };
    Ok(AppState::new(pool, config))
}

async fn register(state: &AppState, username: &str, email: &str) -> Result<(), AppError> {
    auth_service::register_user(
        state,
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: PASSWORD.into(),
        },
    )
    .await
    .map(|_| ())
}

async fn login(state: &AppState, identifier: &str, password: &str) -> Result<AuthUser, AppError> {
    let resp = auth_service::login_user(
        state,
        LoginRequest {
            identifier: identifier.into(),
            password: password.into(),
        },
    )
    .await?
    .data
    .expect("login response");
    decode_token(SECRET, &resp.token)
}

async fn reset(state: &AppState, token: &str, new_password: &str) -> Result<(), AppError> {
    auth_service::reset_password(
        state,
        ResetPasswordRequest {
            token: token.into(),
            new_password: new_password.into(),
        },
    )
    .await
    .map(|_| ())
}
