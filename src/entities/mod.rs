pub mod category;
pub mod inquiry;
pub mod page;
pub mod user;
pub mod vehicle;
pub mod vehicle_image;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, Schema, Set,
    TransactionTrait,
};

use crate::config::Config;
use crate::entities::{
    category::Entity as Category, inquiry::Entity as Inquiry, page::Entity as Page,
    user::Entity as User, vehicle::Entity as Vehicle, vehicle_image::Entity as VehicleImage,
};

pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    // Creation order follows foreign key dependencies.
    let mut statements = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Vehicle),
        schema.create_table_from_entity(VehicleImage),
        schema.create_table_from_entity(Inquiry),
        schema.create_table_from_entity(Page),
    ];

    for stmt in statements.iter_mut() {
        stmt.if_not_exists();
        db.execute(backend.build(&*stmt)).await?;
    }

    Ok(())
}

/// Seeds the default category set and the single admin credential. Both
/// seeds are skipped when their table already has rows; the category batch
/// goes through one transaction so an interrupted bootstrap cannot leave a
/// partially-seeded table behind.
pub async fn seed(db: &DatabaseConnection, config: &Config) -> Result<(), DbErr> {
    seed_categories(db).await?;
    seed_admin(db, config).await?;
    Ok(())
}

const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("クレーン車", "Crane", "crane"),
    ("ダンプ", "Dump truck", "dump"),
    ("ミキサー車", "Mixer truck", "mixer"),
    ("車載車", "Car carrier", "carrier"),
    ("その他", "Other", "other"),
];

async fn seed_categories(db: &DatabaseConnection) -> Result<(), DbErr> {
    if Category::find().count(db).await? > 0 {
        return Ok(());
    }

    let rows = DEFAULT_CATEGORIES
        .iter()
        .map(|(name_ja, name_en, slug)| category::ActiveModel {
            name_ja: Set((*name_ja).to_owned()),
            name_en: Set((*name_en).to_owned()),
            slug: Set((*slug).to_owned()),
            ..Default::default()
        });

    let txn = db.begin().await?;
    Category::insert_many(rows).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection, config: &Config) -> Result<(), DbErr> {
    if User::find().count(db).await? > 0 {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(config.admin_password.as_bytes(), &salt)
        .map_err(|err| DbErr::Custom(format!("failed to hash admin password: {err}")))?
        .to_string();

    let admin = user::ActiveModel {
        username: Set(config.admin_username.clone()),
        password: Set(password_hash),
        role: Set(user::Role::Admin),
        ..Default::default()
    };

    User::insert(admin).exec(db).await?;

    tracing::info!(username = %config.admin_username, "seeded admin user");
    Ok(())
}
