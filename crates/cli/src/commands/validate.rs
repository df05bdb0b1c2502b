//! # CLI Validate Command
//!
//! Checks configuration without starting anything.

use error::{AppError, Result};
use tracing::info;

use crate::{
    commands::ValidateArgs,
    config::{database_config, jwt_config},
};

/// URL prefixes of the supported database backends.
const SUPPORTED_SCHEMES: [&str; 3] = ["postgres://", "postgresql://", "sqlite:"];

/// Every configuration problem found, empty when the settings are usable.
pub fn problems(args: &ValidateArgs) -> Vec<String> {
    let mut problems = Vec::new();

    if let Err(e) = jwt_config(&args.jwt) {
        problems.push(e.message());
    }

    let database = database_config(&args.database);
    let url = database.connection_url();
    if !SUPPORTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        problems.push(format!(
            "Database URL must start with one of {}",
            SUPPORTED_SCHEMES.join(", ")
        ));
        return problems;
    }

    match database.resolved_url() {
        Ok((_, ssl_mode)) => {
            info!(
                target: "validate",
                ssl_mode = ssl_mode.map(|m| m.as_str()).unwrap_or("n/a"),
                "Database URL resolved"
            );
        },
        Err(e) => problems.push(e.message()),
    }

    problems
}

/// Validates the CLI configuration
///
/// # Errors
///
/// Returns a validation error listing every problem found.
pub fn validate(args: &ValidateArgs) -> Result<()> {
    let problems = problems(args);
    if !problems.is_empty() {
        return Err(AppError::validation(problems.join("; ")));
    }

    info!(target: "validate", "Configuration is valid");
    Ok(())
}
