/*
 *  Kudos - Discord bot that promotes highly-reacted messages into a ladder channel.
 *  Copyright (C) 2025  Manuel de Castro
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
use crate::{Context, Error};
use poise::serenity_prelude::{GuildChannel, Mentionable, Role, RoleId};

/**
 * The decision behind the admin gate: guild managers always pass; everyone else must hold
 * the configured ladder admin role, if one is set at all.
 */
fn is_ladder_admin(
    has_manage_guild: bool,
    member_roles: &[RoleId],
    admin_role_id: Option<RoleId>,
) -> bool {
    if has_manage_guild {
        return true;
    }
    match admin_role_id {
        Some(role_id) => member_roles.contains(&role_id),
        None => false,
    }
}

/**
 * Gate for the settings subcommands: the caller must hold the Manage Server permission, or
 * the configured ladder admin role. Denied callers get an ephemeral rejection and no setting
 * is touched.
 */
async fn ladder_admin_check(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        // Commands are guild_only; this cannot happen through Discord.
        return Ok(false);
    };

    let has_manage_guild = member
        .permissions(&ctx.serenity_context().cache)?
        .manage_guild();
    let admin_role = ctx.data().ladder.lock().await.admin_role_id;

    if is_ladder_admin(has_manage_guild, &member.roles, admin_role) {
        return Ok(true);
    }

    ctx.reply("⛔ You need the Manage Server permission or the ladder admin role to use this command.")
        .await
        .expect("[ladderconfig] Failed to send the permission-denied reply.");

    Ok(false)
}

#[poise::command(
    slash_command,
    subcommands("channel", "emoji", "threshold", "admin_role", "status"),
    guild_only,
    ephemeral
)]
#[kudos::log_cmd]
pub async fn ladder(ctx: Context<'_>) -> Result<(), Error> {
    // This function will not be executed, as the command has subcommands.
    Ok(())
}

#[poise::command(
    slash_command,
    ephemeral,
    check = "ladder_admin_check",
    description_localized("en-US", "Set the channel promoted messages are reposted into."),
    description_localized("es-ES", "Configurar el canal donde se republican los mensajes promocionados.")
)]
#[kudos::log_cmd]
pub async fn channel(
    ctx: Context<'_>,
    #[description = "The channel promoted messages will be posted to."] channel: GuildChannel,
) -> Result<(), Error> {
    let data = ctx.data();
    {
        let mut config = data.ladder.lock().await;
        config.ladder_channel_id = Some(channel.id);
        data.store.save(&config).await?;
    }

    // Reply to the user, as confirmation:
    ctx.reply(format!("✅ Ladder channel set to {}.", channel.mention()))
        .await
        .expect("[ladderconfig] Failed to send confirmation of the ladder channel change.");

    Ok(())
}

#[poise::command(
    slash_command,
    ephemeral,
    check = "ladder_admin_check",
    description_localized("en-US", "Set the reaction emoji the ladder tracks."),
    description_localized("es-ES", "Configurar el emoji de reacción que sigue el ladder.")
)]
#[kudos::log_cmd]
pub async fn emoji(
    ctx: Context<'_>,
    #[description = "The reaction emoji counted towards promotion."] emoji: String,
) -> Result<(), Error> {
    let data = ctx.data();
    {
        let mut config = data.ladder.lock().await;
        config.emoji = emoji.clone();
        data.store.save(&config).await?;
    }

    // Reply to the user, as confirmation:
    ctx.reply(format!("✅ Ladder emoji set to {}.", emoji))
        .await
        .expect("[ladderconfig] Failed to send confirmation of the emoji change.");

    Ok(())
}

#[poise::command(
    slash_command,
    ephemeral,
    check = "ladder_admin_check",
    description_localized("en-US", "Set the reaction count required for promotion."),
    description_localized("es-ES", "Configurar el número de reacciones necesario para la promoción.")
)]
#[kudos::log_cmd]
pub async fn threshold(
    ctx: Context<'_>,
    #[description = "Minimum reaction count for a message to enter the ladder."] value: i64,
) -> Result<(), Error> {
    let data = ctx.data();
    let effective = {
        let mut config = data.ladder.lock().await;
        config.set_threshold(value);
        data.store.save(&config).await?;
        config.threshold
    };

    // Reply to the user, as confirmation (the threshold may have been clamped):
    ctx.reply(format!("✅ Promotion threshold set to {}.", effective))
        .await
        .expect("[ladderconfig] Failed to send confirmation of the threshold change.");

    Ok(())
}

#[poise::command(
    slash_command,
    ephemeral,
    description_localized("en-US", "Set the role allowed to administer the ladder."),
    description_localized("es-ES", "Configurar el rol autorizado a administrar el ladder.")
)]
#[kudos::log_cmd]
pub async fn admin_role(
    ctx: Context<'_>,
    #[description = "Role allowed to change the ladder settings."] role: Role,
) -> Result<(), Error> {
    // Only an actual guild manager may decide who administers the ladder; the configured
    // role itself is not enough for this one.
    let Some(member) = ctx.author_member().await else {
        return Ok(());
    };
    if !member
        .permissions(&ctx.serenity_context().cache)?
        .manage_guild()
    {
        ctx.reply("⛔ The Manage Server permission is required to set the ladder admin role.")
            .await
            .expect("[ladderconfig] Failed to send the permission-denied reply.");
        return Ok(());
    }

    let data = ctx.data();
    {
        let mut config = data.ladder.lock().await;
        config.admin_role_id = Some(role.id);
        data.store.save(&config).await?;
    }

    // Reply to the user, as confirmation:
    ctx.reply(format!("✅ Ladder admin role set to {}.", role.mention()))
        .await
        .expect("[ladderconfig] Failed to send confirmation of the admin role change.");

    Ok(())
}

#[poise::command(
    slash_command,
    ephemeral,
    description_localized("en-US", "Show the current ladder configuration."),
    description_localized("es-ES", "Ver la configuración actual del ladder.")
)]
#[kudos::log_cmd]
pub async fn status(ctx: Context<'_>) -> Result<(), Error> {
    let reply_msg = {
        let config = ctx.data().ladder.lock().await;

        let channel_txt = match config.ladder_channel_id {
            Some(channel_id) => channel_id.mention().to_string(),
            None => String::from("*not set*"),
        };
        let role_txt = match config.admin_role_id {
            Some(role_id) => role_id.mention().to_string(),
            None => String::from("*not set*"),
        };

        format!(
            "**Ladder channel:** {}\n\
            **Emoji:** {}\n\
            **Threshold:** {}\n\
            **Admin role:** {}\n\
            **Promoted messages:** {}",
            channel_txt,
            config.emoji,
            config.threshold,
            role_txt,
            config.promoted.len()
        )
    };

    ctx.reply(reply_msg)
        .await
        .expect("[ladderconfig] Failed to send the ladder status.");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callers_with_neither_permission_nor_role_are_denied() {
        // Holding unrelated roles does not help:
        assert!(!is_ladder_admin(
            false,
            &[RoleId::new(1)],
            Some(RoleId::new(2))
        ));
        assert!(!is_ladder_admin(false, &[], None));
    }

    #[test]
    fn guild_managers_always_pass() {
        assert!(is_ladder_admin(true, &[], None));
        assert!(is_ladder_admin(true, &[], Some(RoleId::new(2))));
    }

    #[test]
    fn the_configured_role_grants_access() {
        assert!(is_ladder_admin(
            false,
            &[RoleId::new(5), RoleId::new(2)],
            Some(RoleId::new(2))
        ));
        // With no role configured, only guild managers pass:
        assert!(!is_ladder_admin(false, &[RoleId::new(2)], None));
    }
}
