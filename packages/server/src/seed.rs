use sea_orm::*;
use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{contact_message, image_object, role, role_permission, template_keyword, user};
use crate::extractors::auth::{CONTENT_MANAGE, MEDIA_MANAGE, MESSAGE_READ, USER_MANAGE};
use crate::utils::hash;

/// Default roles seeded on startup.
const DEFAULT_ROLES: &[&str] = &["admin", "editor", role::DEFAULT_ROLE];

/// Default role-permission mappings seeded on startup.
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    // Admin: all permissions
    ("admin", CONTENT_MANAGE),
    ("admin", MEDIA_MANAGE),
    ("admin", MESSAGE_READ),
    ("admin", USER_MANAGE),
    // Editor
    ("editor", CONTENT_MANAGE),
    ("editor", MEDIA_MANAGE),
];

/// Seed the `role` and `role_permission` tables with defaults.
pub async fn seed_role_permissions(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut roles_inserted = 0u32;
    for &name in DEFAULT_ROLES {
        let model = role::ActiveModel {
            name: Set(name.to_string()),
        };

        let result = role::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => roles_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if roles_inserted > 0 {
        info!("Seeded {} new roles", roles_inserted);
    }

    let mut perms_inserted = 0u32;
    for &(role, permission) in DEFAULT_MAPPINGS {
        let model = role_permission::ActiveModel {
            role: Set(role.to_string()),
            permission: Set(permission.to_string()),
        };

        let result = role_permission::Entity::insert(model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    role_permission::Column::Role,
                    role_permission::Column::Permission,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(n) if n > 0 => perms_inserted += 1,
            Ok(_) | Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if perms_inserted > 0 {
        info!("Seeded {} new role-permission mappings", perms_inserted);
    }

    Ok(())
}

/// Create the configured admin account if it does not exist yet.
///
/// An existing account with the same username is left untouched, including
/// its password and role.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection, cfg: &AuthConfig) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (&cfg.bootstrap_admin, &cfg.bootstrap_password) else {
        return Ok(());
    };
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        anyhow::bail!("auth.bootstrap_admin and auth.bootstrap_password must not be empty");
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        info!(username, "Bootstrap admin already exists");
        return Ok(());
    }

    let hash = hash::hash_password(password)
        .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;
    user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(hash),
        role: Set("admin".to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(username, "Created bootstrap admin");
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        // Keyword filter on the portfolio: template_keyword WHERE keyword_id IN (...)
        Index::create()
            .if_not_exists()
            .name("idx_template_keyword_keyword")
            .table(template_keyword::Entity)
            .col(template_keyword::Column::KeywordId)
            .col(template_keyword::Column::TemplateId)
            .to_string(PostgresQueryBuilder),
        // Newest-first admin inbox
        Index::create()
            .if_not_exists()
            .name("idx_contact_message_created")
            .table(contact_message::Entity)
            .col(contact_message::Column::CreatedAt)
            .col(contact_message::Column::Id)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_image_object_created")
            .table(image_object::Entity)
            .col(image_object::Column::CreatedAt)
            .col(image_object::Column::Id)
            .to_string(PostgresQueryBuilder),
    ];

    for stmt in indexes {
        if let Err(e) = db.execute_unprepared(&stmt).await {
            tracing::warn!("Failed to create index: {}", e);
        }
    }

    info!("Ensured secondary indexes exist");
    Ok(())
}
