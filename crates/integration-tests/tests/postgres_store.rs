//! Integration tests for the `PostgreSQL` repositories.
//!
//! These are ignored by default. Point `SWEETBLISS_TEST_DATABASE_URL` at a
//! scratch database and run `cargo test -- --ignored`. Migrations are applied
//! on connect, and every test uses fresh email addresses so runs don't collide.

use secrecy::SecretString;
use sqlx::PgPool;
use uuid::Uuid;

use sweet_bliss_api::db::{
    self, CartRepository, CartStore, MIGRATOR, RepositoryError, UserRepository, UserStore,
};
use sweet_bliss_api::models::cart::Cart;
use sweet_bliss_api::models::user::NewUser;
use sweet_bliss_api::services::cart::{CartLocks, CartService};
use sweet_bliss_core::{Email, Price, UserId};

async fn pool() -> PgPool {
    let url = std::env::var("SWEETBLISS_TEST_DATABASE_URL")
        .expect("SWEETBLISS_TEST_DATABASE_URL must point at a scratch database");
    let pool = db::create_pool(&SecretString::from(url))
        .await
        .expect("Failed to connect to test database");
    MIGRATOR.run(&pool).await.expect("Failed to run migrations");
    pool
}

fn unique_email() -> Email {
    Email::parse(&format!("baker-{}@example.com", Uuid::new_v4())).unwrap()
}

async fn create_user(users: &UserRepository) -> UserId {
    users
        .create(NewUser {
            name: "Test Baker".to_string(),
            email: unique_email(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        })
        .await
        .unwrap()
        .id
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL test database"]
async fn test_unique_email_constraint() {
    let pool = pool().await;
    let users = UserRepository::new(pool);
    let email = unique_email();

    let new_user = |email: Email| NewUser {
        name: "Test Baker".to_string(),
        email,
        password_hash: "hash".to_string(),
    };

    let created = users.create(new_user(email.clone())).await.unwrap();
    let err = users.create(new_user(email.clone())).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Conflict(_)));

    let (found, hash) = users.get_password_hash(&email).await.unwrap().unwrap();
    assert_eq!(found, created);
    assert_eq!(hash, "hash");
    assert_eq!(users.get_by_id(created.id).await.unwrap(), Some(created));
    assert!(users.ping().await.is_ok());
}

// =============================================================================
// Carts
// =============================================================================

#[tokio::test]
#[ignore = "Requires a PostgreSQL test database"]
async fn test_cart_compare_and_swap() {
    let pool = pool().await;
    let owner = create_user(&UserRepository::new(pool.clone())).await;
    let carts = CartRepository::new(pool);

    assert!(carts.load(owner).await.unwrap().is_none());

    let mut cart = Cart::new();
    cart.add("Donut", Price::from_cents(250).unwrap(), "img.png");
    assert!(carts.insert(owner, &cart).await.unwrap());
    assert!(!carts.insert(owner, &cart).await.unwrap());

    cart.add("Donut", Price::from_cents(250).unwrap(), "img.png");
    assert!(carts.compare_and_swap(owner, 0, &cart).await.unwrap());
    assert!(!carts.compare_and_swap(owner, 0, &Cart::new()).await.unwrap());

    let stored = carts.load(owner).await.unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.cart, cart);
}

#[tokio::test]
#[ignore = "Requires a PostgreSQL test database"]
async fn test_cart_service_over_postgres() {
    let pool = pool().await;
    let owner = create_user(&UserRepository::new(pool.clone())).await;
    let repo = CartRepository::new(pool);
    let locks = CartLocks::new();
    let carts = CartService::new(&repo, &locks);
    let price = Price::from_cents(250).unwrap();

    carts.add(owner, "Donut", price, "img.png").await.unwrap();
    carts.add(owner, "Donut", price, "img.png").await.unwrap();
    carts.update_quantity(owner, "Donut", 7).await.unwrap();

    let items = carts.get(owner).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity, 7);
    assert_eq!(items[0].price, price);

    carts.clear(owner).await.unwrap();
    assert!(carts.get(owner).await.unwrap().is_empty());
}
