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
use crate::config::PromotedEntry;
use crate::leaderboard::{AuthorKey, AuthorStats};
use crate::utils;
use poise::serenity_prelude::{
    Colour, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, Mentionable, Message,
};

/// Placeholder shown in place of an empty message body (e.g. attachment-only messages).
const EMPTY_CONTENT: &str = "*—*";

/// Longest content snippet shown on a leaderboard row.
const SNIPPET_CHARS: usize = 200;

/**
 * Formats an epoch-seconds timestamp the way the ladder displays it (day/month/year
 * hour:minute, UTC).
 */
pub fn format_timestamp(ts: f64) -> String {
    chrono::DateTime::from_timestamp(ts as i64, 0)
        .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_default()
}

/**
 * Builds the embed reposted into the ladder channel for a promoted message: reaction tally,
 * author, body with a jump link, creation time, and the first image/video attachment if any.
 */
pub fn promoted_embed(emoji: &str, msg: &Message, count: u64) -> CreateEmbed {
    let content = if msg.content.is_empty() {
        EMPTY_CONTENT
    } else {
        msg.content.as_str()
    };

    let mut embed = CreateEmbed::new()
        .colour(Colour::DARK_GREY)
        .title(format!(
            "{} **{}** | {}",
            emoji,
            count,
            msg.channel_id.mention()
        ))
        .description(format!("{}\n\n[Jump to message]({})", content, msg.link()))
        .author(CreateEmbedAuthor::new(msg.author.display_name()).icon_url(msg.author.face()))
        .footer(CreateEmbedFooter::new(format_timestamp(
            msg.timestamp.unix_timestamp() as f64,
        )));

    if let Some(attachment) = msg.attachments.first() {
        let embeddable = attachment
            .content_type
            .as_deref()
            .is_some_and(|t| t.starts_with("image/") || t.starts_with("video/"));
        if embeddable {
            embed = embed.image(attachment.url.clone());
        }
    }

    embed
}

/**
 * Builds the ranked-messages leaderboard embed. The thumbnail is the avatar of whoever holds
 * rank 1.
 */
pub fn top_messages_embed(emoji: &str, limit: usize, ranked: &[&PromotedEntry]) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .colour(Colour::GOLD)
        .title(format!("🏆 Top {} most {} messages", limit, emoji));

    if let Some(first) = ranked.first() {
        if !first.author_avatar.is_empty() {
            embed = embed.thumbnail(first.author_avatar.clone());
        }
    }

    for (rank, entry) in ranked.iter().enumerate() {
        let snippet = entry.content.trim();
        let snippet = if snippet.is_empty() {
            EMPTY_CONTENT.to_string()
        } else {
            utils::truncate(snippet, SNIPPET_CHARS)
        };

        embed = embed.field(
            format!(
                "#{} — {} **{}** — by **{}**",
                rank + 1,
                emoji,
                entry.count,
                entry.author_name
            ),
            format!("> {}\n[🔗 Jump to message]({})", snippet, entry.url),
            false,
        );
    }

    embed
}

/**
 * Builds the ranked-authors leaderboard embed (1 point = 1 matching reaction on one of the
 * author's promoted messages).
 */
pub fn top_authors_embed(
    emoji: &str,
    limit: usize,
    board: &[(AuthorKey, AuthorStats)],
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .colour(Colour::BLURPLE)
        .title(format!("🏆 Top {} authors — {} ladder", limit, emoji));

    if let Some((_, first)) = board.first() {
        if !first.avatar().is_empty() {
            embed = embed.thumbnail(first.avatar().clone());
        }
    }

    for (rank, (key, stats)) in board.iter().enumerate() {
        let mention = match key.mention() {
            Some(mention) => format!(" ({})", mention),
            None => String::new(),
        };
        let plural = if *stats.msgs() == 1 { "" } else { "s" };

        embed = embed.field(
            format!("**#{}** — {}{}", rank + 1, stats.name(), mention),
            format!(
                "**{}** points • {} message{} • best post: {} {}",
                stats.points(),
                stats.msgs(),
                plural,
                stats.best_single(),
                emoji
            ),
            false,
        );
    }

    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_render_day_first() {
        assert_eq!(format_timestamp(0.0), "01/01/1970 00:00");
        // 2023-08-15 14:30 UTC
        assert_eq!(format_timestamp(1_692_109_800.0), "15/08/2023 14:30");
    }

    #[test]
    fn unrepresentable_timestamps_render_empty() {
        assert_eq!(format_timestamp(f64::MAX), "");
    }
}
