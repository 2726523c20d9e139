//! Pre-command checks.

use crate::bot::Context;
use crate::bot::Error;
use crate::bot::error::BotError;

/// Passes when the author holds the configured admin role.
pub async fn require_admin_role(ctx: Context<'_>) -> Result<bool, Error> {
    let role = ctx.data().config.admin_role.clone();
    require_role(ctx, &role).await?;
    Ok(true)
}

/// Fails with [`BotError::MissingRole`] unless the author has a role named
/// `role`.
///
/// Only a private channel counts as [`BotError::GuildOnlyCommand`]. A guild
/// whose member or role data cannot be resolved fails the check without
/// blaming the author.
pub async fn require_role(ctx: Context<'_>, role: &str) -> Result<(), Error> {
    if ctx.guild_id().is_none() {
        return Err(BotError::GuildOnlyCommand.into());
    }
    let member = ctx.author_member().await;
    let role_names: Option<Vec<String>> = member.and_then(|member| {
        let guild = ctx.guild()?;
        Some(
            member
                .roles
                .iter()
                .filter_map(|id| guild.roles.get(id).map(|r| r.name.clone()))
                .collect(),
        )
    });

    Ok(check_role_inner(role_names.as_deref(), role)?)
}

fn check_role_inner(user_roles: Option<&[String]>, required_role: &str) -> Result<(), BotError> {
    let Some(user_roles) = user_roles else {
        return Err(BotError::CheckFailed(
            "Server roles are not available yet, try again shortly.".to_string(),
        ));
    };
    if user_roles.iter().any(|name| name == required_role) {
        return Ok(());
    }
    Err(BotError::MissingRole {
        role: required_role.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::failure::CheckKind;
    use crate::bot::failure::FailureKind;

    #[test]
    fn test_check_role_with_required_role() {
        let roles = vec!["Member".to_string(), "Admin".to_string()];
        assert!(check_role_inner(Some(roles.as_slice()), "Admin").is_ok());
    }

    #[test]
    fn test_check_role_is_case_sensitive() {
        let roles = vec!["admin".to_string()];
        assert!(check_role_inner(Some(roles.as_slice()), "Admin").is_err());
    }

    #[test]
    fn test_check_role_without_roles_fails() {
        match check_role_inner(Some(&[][..]), "Admin").unwrap_err() {
            BotError::MissingRole { role } => assert_eq!(role, "Admin"),
            other => panic!("Expected MissingRole error, got {:?}", other),
        }
    }

    #[test]
    fn test_check_role_with_unresolved_roles_is_not_a_dm_failure() {
        let error = check_role_inner(None, "Admin").unwrap_err();
        assert!(matches!(error, BotError::CheckFailed(_)));
        assert_eq!(error.kind(), FailureKind::Check(CheckKind::Other));
        assert_ne!(error.kind(), FailureKind::NoPrivateMessage);
    }
}
