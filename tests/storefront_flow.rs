use storefront_api::{
    catalog::MAX_PRICE,
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        cart::{AddToCartRequest, MAX_CART_QTY, QuantityChange},
        comments::AddCommentRequest,
        products::CreateProductRequest,
    },
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    models::Role,
    routes::params::{Pagination, ProductQuery},
    services::{
        admin_service, auth_service, cart_service, comment_service, dashboard_service, like_service,
        product_service,
    },
    state::AppState,
};
use uuid::Uuid;

const SECRET: &str = "flow-test-secret";

// Walks a customer through likes, comments and the cart against a real database.
#[tokio::test]
async fn likes_comments_and_cart_flow() -> anyhow::Result<()> {
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

    let customer = register_and_login(&state, "budi", "budi@example.com").await?;
    assert_eq!(customer.role, Role::Users);

    let admin_id = register_and_login(&state, "admin", "admin@example.com")
        .await?
        .user_id;
    set_role(&state, admin_id, "admins").await?;
    let admin = login(&state, "admin@example.com").await?;
    assert_eq!(admin.role, Role::Admins);

    // Admin creates a discounted product; chips keep their order.
    let created = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "  Kemeja Flanel ".into(),
            description: Some("Katun".into()),
            price: 150_000,
            discount: 10,
            stock: 5,
            require_login: false,
            categories: vec!["fashion".into(), " pria ".into(), "fashion".into()],
            images: vec!["https://img/2.jpg".into(), "".into(), "https://img/1.jpg".into()],
            extra_images: Vec::new(),
            labels: vec!["promo".into()],
            extra_form: None,
        },
    )
    .await?
    .data
    .expect("product");
    assert_eq!(created.name, "Kemeja Flanel");
    assert_eq!(created.final_price, 135_000);
    assert_eq!(created.labels, vec!["promo", "diskon", "baru"]);

    let detail = product_service::get_product(&state, Some(&customer), created.id)
        .await?
        .data
        .expect("detail");
    assert_eq!(detail.product.categories, vec!["fashion", "pria"]);
    assert_eq!(
        detail.product.images,
        vec!["https://img/2.jpg", "https://img/1.jpg"]
    );
    let viewer = detail.viewer.expect("viewer state");
    assert!(!viewer.liked);
    assert!(!viewer.in_cart);

    // Members-only product is hidden from anonymous viewers.
    let private = product_service::create_product(
        &state,
        &admin,
        CreateProductRequest {
            name: "Voucher Member".into(),
            description: None,
            price: 50_000,
            discount: 0,
            stock: 10,
            require_login: true,
            categories: vec!["voucher".into()],
            images: vec!["https://img/v.jpg".into()],
            extra_images: Vec::new(),
            labels: Vec::new(),
            extra_form: None,
        },
    )
    .await?
    .data
    .expect("product");
    let anonymous = product_service::list_products(&state, None, ProductQuery::default())
        .await?
        .data
        .expect("list");
    assert!(anonymous.items.iter().all(|p| p.id != private.id));
    let member = product_service::list_products(&state, Some(&customer), ProductQuery::default())
        .await?
        .data
        .expect("list");
    assert!(member.items.iter().any(|p| p.id == private.id));
    assert!(matches!(
        product_service::get_product(&state, None, private.id).await,
        Err(AppError::Unauthorized(_))
    ));

    // Likes are idempotent and never go negative.
    like_service::like_product(&state, &customer, created.id).await?;
    let twice = like_service::like_product(&state, &customer, created.id)
        .await?
        .data
        .expect("like");
    assert!(twice.liked);
    assert_eq!(twice.likes, 1);

    let unliked = like_service::unlike_product(&state, &customer, created.id)
        .await?
        .data
        .expect("unlike");
    assert_eq!(unliked.likes, 0);
    let again = like_service::unlike_product(&state, &customer, created.id)
        .await?
        .data
        .expect("unlike");
    assert!(!again.liked);
    assert_eq!(again.likes, 0);

    let toggled = like_service::toggle_like(&state, &customer, created.id)
        .await?
        .data
        .expect("toggle");
    assert!(toggled.liked);
    assert_eq!(toggled.likes, 1);

    // Two toggles at once cancel out.
    let (a, b) = tokio::join!(
        like_service::toggle_like(&state, &customer, created.id),
        like_service::toggle_like(&state, &customer, created.id),
    );
    let (a, b) = (a?.data.expect("toggle"), b?.data.expect("toggle"));
    assert_ne!(a.liked, b.liked);
    let after = like_service::like_status(&state, &customer, created.id)
        .await?
        .data
        .expect("status");
    assert!(after.liked);
    assert_eq!(after.likes, 1);

    // Comments: newest first, name falls back to the username.
    comment_service::add_comment(
        &state,
        &customer,
        created.id,
        AddCommentRequest {
            name: None,
            text: "Bahannya adem".into(),
        },
    )
    .await?;
    comment_service::add_comment(
        &state,
        &customer,
        created.id,
        AddCommentRequest {
            name: Some("   ".into()),
            text: "Ukuran pas".into(),
        },
    )
    .await?;
    let comments = comment_service::list_comments(&state, created.id, Pagination::default())
        .await?
        .data
        .expect("comments");
    let names: Vec<_> = comments.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Anonim", "budi"]);
    assert!(matches!(
        comment_service::add_comment(
            &state,
            &customer,
            created.id,
            AddCommentRequest {
                name: None,
                text: "  ".into(),
            },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));

    // Cart: one row per product, quantity never below 1.
    let added = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: created.id,
        },
    )
    .await?;
    assert_eq!(added.message, "Ditambahkan ke keranjang");
    let item = added.data.expect("cart item");
    assert_eq!(item.qty, 1);
    assert_eq!(item.price, 135_000);
    assert_eq!(item.image, "https://img/2.jpg");

    let repeat = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: created.id,
        },
    )
    .await?;
    assert_eq!(repeat.message, "Sudah ada di keranjang");

    cart_service::remove_from_cart(&state, &customer, created.id).await?;
    let readded = cart_service::add_to_cart(
        &state,
        &customer,
        AddToCartRequest {
            product_id: created.id,
        },
    )
    .await?;
    assert_eq!(readded.message, "Ditambahkan ke keranjang");

    let item = cart_service::change_quantity(&state, &customer, created.id, QuantityChange::Decrement)
        .await?
        .data
        .expect("item");
    assert_eq!(item.qty, 1);
    let item = cart_service::change_quantity(
        &state,
        &customer,
        created.id,
        QuantityChange::Set { qty: i32::MAX },
    )
    .await?
    .data
    .expect("item");
    assert_eq!(item.qty, MAX_CART_QTY);
    let item = cart_service::change_quantity(
        &state,
        &customer,
        created.id,
        QuantityChange::Set { qty: 3 },
    )
    .await?
    .data
    .expect("item");
    assert_eq!(item.qty, 3);

    let summary = cart_service::list_cart(&state, &customer)
        .await?
        .data
        .expect("cart");
    assert_eq!(summary.count, 1);
    assert_eq!(summary.total, 405_000);

    let dashboard = dashboard_service::user_dashboard(&state, &customer)
        .await?
        .data
        .expect("dashboard");
    assert_eq!(dashboard.cart.count, 1);
    assert!(matches!(
        dashboard_service::admin_dashboard(&state, &customer).await,
        Err(AppError::Forbidden)
    ));
    let admin_view = dashboard_service::admin_dashboard(&state, &admin)
        .await?
        .data
        .expect("admin dashboard");
    assert_eq!(admin_view.product_count, 2);
    assert_eq!(admin_view.total_likes, 1);

    // Deleting the product takes its likes, comments and cart rows along.
    product_service::delete_product(&state, &admin, created.id).await?;
    let summary = cart_service::list_cart(&state, &customer)
        .await?
        .data
        .expect("cart");
    assert_eq!(summary.count, 0);
    assert!(matches!(
        comment_service::list_comments(&state, created.id, Pagination::default()).await,
        Err(AppError::NotFound(_))
    ));

    // A demoted admin keeps a valid admin token but loses admin rights at once.
    set_role(&state, admin.user_id, "users").await?;
    assert!(matches!(
        product_service::create_product(&state, &admin, simple_product("Topi")).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        product_service::delete_product(&state, &admin, private.id).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        admin_service::list_products(&state, &admin, ProductQuery::default()).await,
        Err(AppError::Forbidden)
    ));

    // Prices above the ceiling never reach the table.
    set_role(&state, admin.user_id, "admins").await?;
    let mut pricey = simple_product("Berlian");
    pricey.price = MAX_PRICE + 1;
    pricey.discount = 10;
    assert!(matches!(
        product_service::create_product(&state, &admin, pricey).await,
        Err(AppError::BadRequest(_))
    ));

    Ok(())
}

fn simple_product(name: &str) -> CreateProductRequest {
    CreateProductRequest {
        name: name.into(),
        description: None,
        price: 10_000,
        discount: 0,
        stock: 1,
        require_login: false,
        categories: Vec::new(),
        images: vec!["https://img/x.jpg".into()],
        extra_images: Vec::new(),
        labels: Vec::new(),
        extra_form: None,
    }
}

async fn set_role(state: &AppState, user_id: Uuid, role: &str) -> anyhow::Result<()> {
    sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
        .bind(user_id)
        .bind(role)
        .execute(&state.pool)
        .await?;
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

async fn register_and_login(
    state: &AppState,
    username: &str,
    email: &str,
) -> anyhow::Result<AuthUser> {
    auth_service::register_user(
        state,
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: "rahasia123".into(),
        },
    )
    .await?;
    login(state, email).await
}

async fn login(state: &AppState, identifier: &str) -> anyhow::Result<AuthUser> {
    let resp = auth_service::login_user(
        state,
        LoginRequest {
            identifier: identifier.into(),
            password: "rahasia123".into(),
        },
    )
    .await?
    .data
    .expect("login response");
    Ok(decode_token(SECRET, &resp.token)?)
}
