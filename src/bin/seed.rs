use storefront_api::{
    catalog::derive_labels,
    config::AppConfig,
    db::{DbPool, create_pool, run_migrations},
    models::Role,
    services::auth_service::hash_password,
};
use uuid::Uuid;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: i64,
    discount: i32,
    stock: i32,
    require_login: bool,
    categories: &'static [&'static str],
    images: &'static [&'static str],
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Kemeja Flanel",
        description: "Kemeja flanel katun, nyaman dipakai harian",
        price: 150_000,
        discount: 10,
        stock: 25,
        require_login: false,
        categories: &["fashion", "pria"],
        images: &[
            "https://picsum.photos/seed/flanel-1/600/600",
            "https://picsum.photos/seed/flanel-2/600/600",
        ],
    },
    SeedProduct {
        name: "Tumbler Stainless",
        description: "Menjaga minuman tetap dingin hingga 12 jam",
        price: 85_000,
        discount: 0,
        stock: 60,
        require_login: false,
        categories: &["rumah tangga"],
        images: &["https://picsum.photos/seed/tumbler/600/600"],
    },
    SeedProduct {
        name: "Sepatu Lari",
        description: "Ringan dengan sol empuk untuk lari jarak jauh",
        price: 420_000,
        discount: 25,
        stock: 12,
        require_login: false,
        categories: &["olahraga", "fashion"],
        images: &[
            "https://picsum.photos/seed/sepatu-1/600/600",
            "https://picsum.photos/seed/sepatu-2/600/600",
            "https://picsum.photos/seed/sepatu-3/600/600",
        ],
    },
    SeedProduct {
        name: "Voucher Member",
        description: "Khusus member terdaftar",
        price: 50_000,
        discount: 0,
        stock: 100,
        require_login: true,
        categories: &["voucher"],
        images: &["https://picsum.photos/seed/voucher/600/600"],
    },
    SeedProduct {
        name: "Tas Ransel",
        description: "Ransel laptop 15 inci, tahan air",
        price: 275_000,
        discount: 0,
        stock: 0,
        require_login: false,
        categories: &["fashion", "aksesoris"],
        images: &["https://picsum.photos/seed/ransel/600/600"],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin@example.com", "admin12345", Role::Admins).await?;
    let user_id = ensure_user(&pool, "budi", "budi@example.com", "budi12345", Role::Users).await?;
    seed_products(&pool, admin_id).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    username: &str,
    email: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, username, email, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_products(pool: &DbPool, admin_id: Uuid) -> anyhow::Result<()> {
    let mut inserted = 0;
    for product in PRODUCTS {
        let labels = derive_labels(product.discount, Vec::<String>::new());
        let categories: Vec<String> = product.categories.iter().map(|c| c.to_string()).collect();
        let images: Vec<String> = product.images.iter().map(|i| i.to_string()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO products
                (id, name, description, price, discount, stock, require_login,
                 categories, images, labels, created_by)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .bind(product.discount)
        .bind(product.stock)
        .bind(product.require_login)
        .bind(&categories)
        .bind(&images)
        .bind(&labels)
        .bind(admin_id)
        .execute(pool)
        .await?;
        inserted += result.rows_affected();
    }

    println!("Seeded {inserted} products");
    Ok(())
}
