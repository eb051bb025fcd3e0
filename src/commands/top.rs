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
use crate::leaderboard::{self, DEFAULT_LIMIT};
use crate::render;
use crate::{Context, Error};
use poise::CreateReply;

/**
 * Ephemeral reply used by both leaderboards when the promoted table is still empty; an empty
 * embed would look broken.
 */
async fn reply_nothing_promoted(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(
        CreateReply::default()
            .content("Nothing has been promoted yet.")
            .ephemeral(true),
    )
    .await
    .expect("[top] Failed to send the empty-ladder reply.");

    Ok(())
}

#[poise::command(
    slash_command,
    guild_only,
    description_localized(
        "en-US",
        "Show the ladder of promoted messages (sorted by reactions, then seniority)."
    ),
    description_localized(
        "es-ES",
        "Ver el ladder de mensajes promocionados (ordenados por reacciones y antigüedad)."
    )
)]
#[kudos::log_cmd]
pub async fn top(
    ctx: Context<'_>,
    #[description = "Maximum number of messages to show (default: 10)."] limit: Option<u32>,
) -> Result<(), Error> {
    let limit = limit.map(|l| l as usize).unwrap_or(DEFAULT_LIMIT);
    let config = ctx.data().ladder.lock().await;

    if config.promoted.is_empty() {
        drop(config);
        return reply_nothing_promoted(ctx).await;
    }

    let ranked = leaderboard::top_messages(&config.promoted, limit);
    let embed = render::top_messages_embed(&config.emoji, limit, &ranked);

    ctx.send(CreateReply::default().embed(embed))
        .await
        .expect("[top] Failed to send the message leaderboard.");

    Ok(())
}

#[poise::command(
    slash_command,
    guild_only,
    description_localized(
        "en-US",
        "Show the author ranking (1 point = 1 reaction on their promoted messages)."
    ),
    description_localized(
        "es-ES",
        "Ver la clasificación de autores (1 punto = 1 reacción en sus mensajes promocionados)."
    )
)]
#[kudos::log_cmd]
pub async fn topauthors(
    ctx: Context<'_>,
    #[description = "Maximum number of authors to show (default: 10)."] limit: Option<u32>,
) -> Result<(), Error> {
    let limit = limit.map(|l| l as usize).unwrap_or(DEFAULT_LIMIT);
    let config = ctx.data().ladder.lock().await;

    if config.promoted.is_empty() {
        drop(config);
        return reply_nothing_promoted(ctx).await;
    }

    let board = leaderboard::top_authors(&config.promoted, limit);
    let embed = render::top_authors_embed(&config.emoji, limit, &board);

    ctx.send(CreateReply::default().embed(embed))
        .await
        .expect("[top] Failed to send the author leaderboard.");

    Ok(())
}
