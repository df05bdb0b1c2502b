//! # Ensure Admin Command
//!
//! Idempotent provisioning of the local administrator: the account is
//! created when its email is unknown, reused otherwise, and then promoted to
//! the `admin` role. Re-running it is always safe.

use auth::{
    assign_role,
    find_role_by_name,
    hash_password,
    secrecy::{ExposeSecret as _, SecretString},
    validate_password_strength,
    RoleName,
};
use chrono::Utc;
use entity::users;
use error::{AppError, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;
use validator::ValidateEmail as _;

use crate::{commands::EnsureAdminArgs, config::database_config};

/// The account to provision.
#[derive(Debug)]
pub struct AdminAccount {
    pub email:        String,
    pub password:     SecretString,
    pub display_name: String,
    pub school_role:  Option<String>,
}

impl From<&EnsureAdminArgs> for AdminAccount {
    fn from(args: &EnsureAdminArgs) -> Self {
        let school_role = args.school_role.trim();
        Self {
            email:        args.email.trim().to_lowercase(),
            password:     SecretString::from(args.password.clone()),
            display_name: args.display_name.trim().to_string(),
            school_role:  (!school_role.is_empty()).then(|| school_role.to_string()),
        }
    }
}

/// What provisioning did.
#[derive(Debug)]
pub struct EnsureAdminOutcome {
    pub user:     users::Model,
    /// The account did not exist before.
    pub created:  bool,
    /// The account's role changed to admin.
    pub promoted: bool,
}

async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<users::Model>> {
    Ok(users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?)
}

async fn create_account(db: &DatabaseConnection, account: &AdminAccount, role_id: Uuid) -> Result<users::Model> {
    if let Err(errors) = validate_password_strength(account.password.expose_secret()) {
        let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(AppError::validation(reasons.join("; ")));
    }

    let password = SecretString::from(account.password.expose_secret().to_string());
    let hash = tokio::task::spawn_blocking(move || hash_password(&password, None))
        .await
        .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;

    let user = users::ActiveModel {
        id:            Set(Uuid::new_v4()),
        role_id:       Set(role_id),
        display_name:  Set(account.display_name.clone()),
        school_role:   Set(account.school_role.clone()),
        email:         Set(account.email.clone()),
        password_hash: Set(hash.expose_secret().to_string()),
        created_at:    Set(Utc::now()),
    }
    .insert(db)
    .await?;

    Ok(user)
}

/// Ensures `account` exists and holds the admin role.
///
/// # Arguments
///
/// * `db` - Database connection
/// * `account` - Email, password and profile for a new account
///
/// # Errors
///
/// * `NotFound` - the admin role has not been seeded
/// * `Validation` - the email fails the same rule sign-in applies, or the
///   password is too weak for a new account
pub async fn ensure_admin(db: &DatabaseConnection, account: &AdminAccount) -> Result<EnsureAdminOutcome> {
    if !account.email.validate_email() {
        return Err(AppError::validation(format!(
            "Invalid admin email: '{}'",
            account.email
        )));
    }

    let admin_role = find_role_by_name(db, RoleName::Admin.as_str())
        .await
        .map_err(|e| {
            match e {
                AppError::NotFound {
                    ..
                } => AppError::not_found("Admin role is missing; roles must be seeded first"),
                other => other,
            }
        })?;

    let (user, created) = match find_by_email(db, &account.email).await? {
        Some(user) => {
            info!(target: "provision", email = %account.email, "Admin account already exists");
            (user, false)
        },
        None => {
            match create_account(db, account, admin_role.id).await {
                Ok(user) => {
                    info!(target: "provision", email = %account.email, user_id = %user.id, "Created admin account");
                    (user, true)
                },
                // Created concurrently by another run.
                Err(AppError::ConstraintViolation {
                    ..
                }) => {
                    let user = find_by_email(db, &account.email)
                        .await?
                        .ok_or_else(|| AppError::internal("Admin account vanished after a duplicate insert"))?;
                    (user, false)
                },
                Err(e) => return Err(e),
            }
        },
    };

    if user.role_id == admin_role.id {
        return Ok(EnsureAdminOutcome {
            user,
            created,
            promoted: false,
        });
    }

    let user = assign_role(db, user.id, admin_role.id).await?;
    Ok(EnsureAdminOutcome {
        user,
        created,
        promoted: true,
    })
}

/// Connects and runs [`ensure_admin`] with the command-line account.
///
/// # Errors
///
/// Returns `Unavailable` when the database cannot be reached, plus every
/// error of [`ensure_admin`].
pub async fn run(args: &EnsureAdminArgs) -> Result<()> {
    let db = database_config(&args.database).connect().await?;
    let outcome = ensure_admin(&db, &AdminAccount::from(args)).await?;

    info!(
        target: "provision",
        email = %outcome.user.email,
        user_id = %outcome.user.id,
        created = outcome.created,
        promoted = outcome.promoted,
        "Local admin ensured"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use entity::roles;
    use migration::{seeds::run_all_seeds, Migrator, MigratorTrait as _};
    use sea_orm::{Database, PaginatorTrait as _};

    use super::*;

    async fn setup(seed_roles: bool) -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        if seed_roles {
            run_all_seeds(&db).await.unwrap();
        }
        db
    }

    fn account(email: &str) -> AdminAccount {
        AdminAccount {
            email:        email.to_string(),
            password:     SecretString::from("Passw0rd!-local".to_string()),
            display_name: "Randy Llobera".to_string(),
            school_role:  Some("Technology Professor".to_string()),
        }
    }

    async fn role_name(db: &DatabaseConnection, user: &users::Model) -> String {
        roles::Entity::find_by_id(user.role_id)
            .one(db)
            .await
            .unwrap()
            .unwrap()
            .name
    }

    #[tokio::test]
    async fn test_creates_admin_once() {
        let db = setup(true).await;

        let first = ensure_admin(&db, &account("admin.local@example.com"))
            .await
            .unwrap();
        assert!(first.created);
        assert!(!first.promoted);
        assert_eq!(role_name(&db, &first.user).await, "admin");
        assert_eq!(first.user.display_name, "Randy Llobera");
        assert_eq!(first.user.school_role.as_deref(), Some("Technology Professor"));

        let second = ensure_admin(&db, &account("admin.local@example.com"))
            .await
            .unwrap();
        assert!(!second.created);
        assert!(!second.promoted);
        assert_eq!(second.user.id, first.user.id);
    }

    #[tokio::test]
    async fn test_promotes_existing_teacher() {
        let db = setup(true).await;
        let teacher = find_role_by_name(&db, "teacher").await.unwrap();
        let existing = create_account(&db, &account("t@school.test"), teacher.id)
            .await
            .unwrap();

        let outcome = ensure_admin(&db, &account("t@school.test")).await.unwrap();

        assert!(!outcome.created);
        assert!(outcome.promoted);
        assert_eq!(outcome.user.id, existing.id);
        assert_eq!(role_name(&db, &outcome.user).await, "admin");
    }

    #[tokio::test]
    async fn test_missing_admin_role_is_not_found() {
        let db = setup(false).await;

        let err = ensure_admin(&db, &account("admin.local@example.com"))
            .await
            .unwrap_err();

        match err {
            AppError::NotFound {
                message,
            } => assert!(message.contains("roles must be seeded first")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_weak_password_rejected_for_new_account() {
        let db = setup(true).await;
        let mut weak = account("weak@school.test");
        weak.password = SecretString::from("short".to_string());

        assert!(matches!(
            ensure_admin(&db, &weak).await,
            Err(AppError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let db = setup(true).await;
        for email in ["not-an-email", "admin@", "@school", "a@b@c"] {
            assert!(
                matches!(
                    ensure_admin(&db, &account(email)).await,
                    Err(AppError::Validation { .. })
                ),
                "{} was accepted",
                email
            );
        }

        let count = users::Entity::find().count(&db).await.unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_account_from_args_normalizes() {
        let args = EnsureAdminArgs {
            email:        "  Admin.Local@Example.com ".to_string(),
            password:     "Passw0rd!-local".to_string(),
            display_name: " Randy Llobera ".to_string(),
            school_role:  "  ".to_string(),
            database:     Default::default(),
        };
        let account = AdminAccount::from(&args);
        assert_eq!(account.email, "admin.local@example.com");
        assert_eq!(account.display_name, "Randy Llobera");
        assert_eq!(account.school_role, None);
    }
}
