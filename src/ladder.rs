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
use crate::config::{AuthorSnapshot, LadderConfig, PromotedEntry};
use crate::render;
use crate::utils;
use crate::{Data, Error};
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::{CreateMessage, EditMessage, Message};

/**
 * What a reaction change means for the affected message.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(PartialEq, Eq)]
pub enum Decision {
    /// Not promoted and below the threshold: nothing to do.
    Skip,
    /// First threshold crossing: repost into the ladder channel and record an entry.
    Promote,
    /// Already promoted: update the repost, whatever the new count is.
    Refresh,
}

/**
 * Decides how to treat a message given its current matching-reaction count.
 *
 * An existing entry is always refreshed, even when the count has dropped back below the
 * threshold; promotion is never undone.
 */
pub fn decide(config: &LadderConfig, message_key: &str, count: u64) -> Decision {
    if config.promoted.contains_key(message_key) {
        Decision::Refresh
    } else if count >= u64::from(config.threshold) {
        Decision::Promote
    } else {
        Decision::Skip
    }
}

/**
 * Current count of reactions matching the configured emoji on a message.
 */
pub fn count_matching_reactions(msg: &Message, emoji: &str) -> u64 {
    msg.reactions
        .iter()
        .find(|r| r.reaction_type.to_string() == emoji)
        .map(|r| r.count)
        .unwrap_or(0)
}

fn snapshot_author(msg: &Message) -> AuthorSnapshot {
    AuthorSnapshot {
        id: Some(msg.author.id),
        name: msg.author.display_name().to_string(),
        avatar: msg.author.face(),
    }
}

/**
 * Applies a reaction change: promotes the message on its first threshold crossing, or
 * refreshes the existing ladder repost. If the repost was deleted externally, it is recreated
 * and the entry rebound to the new message; all other platform errors propagate.
 *
 * Without a configured (and cache-resolvable) ladder channel this is a silent no-op.
 * The ladder state is persisted wholesale after every mutation.
 */
pub async fn post_or_update(
    ctx: &serenity::Context,
    data: &Data,
    msg: &Message,
    count: u64,
) -> Result<(), Error> {
    let mut config = data.ladder.lock().await;

    let Some(ladder_channel) = config.ladder_channel_id else {
        return Ok(());
    };
    if ctx.cache.channel(ladder_channel).is_none() {
        return Ok(());
    }

    let embed = render::promoted_embed(&config.emoji, msg, count);
    let key = msg.id.to_string();

    match decide(&config, &key, count) {
        Decision::Skip => return Ok(()),
        Decision::Refresh => {
            let ladder_msg_id = config.promoted[&key].ladder_msg_id;
            let mut recreated_id = None;
            match ladder_channel.message(ctx, ladder_msg_id).await {
                Ok(mut ladder_msg) => {
                    ladder_msg.edit(ctx, EditMessage::new().embed(embed)).await?;
                }
                Err(e) if utils::is_not_found(&e) => {
                    // The repost was deleted externally; recreate it and rebind the entry.
                    let sent = ladder_channel
                        .send_message(ctx, CreateMessage::new().embed(embed))
                        .await?;
                    recreated_id = Some(sent.id);
                }
                Err(e) => return Err(e.into()),
            }

            let entry = config
                .promoted
                .get_mut(&key)
                .expect("[ladder] Promoted entry vanished mid-update.");
            if let Some(new_id) = recreated_id {
                entry.ladder_msg_id = new_id;
            }
            entry.refresh(snapshot_author(msg), msg.content.clone(), count);
        }
        Decision::Promote => {
            let sent = ladder_channel
                .send_message(ctx, CreateMessage::new().embed(embed))
                .await?;
            config.promoted.insert(
                key,
                PromotedEntry::new(
                    sent.id,
                    snapshot_author(msg),
                    msg.content.clone(),
                    msg.link(),
                    msg.timestamp.unix_timestamp() as f64,
                    count,
                    msg.channel_id,
                ),
            );
        }
    }

    data.store.save(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use poise::serenity_prelude::{ChannelId, MessageId, UserId};

    fn promoted_config(key: &str) -> LadderConfig {
        let mut config = LadderConfig::default();
        config.promoted.insert(
            key.to_string(),
            PromotedEntry::new(
                MessageId::new(500),
                AuthorSnapshot {
                    id: Some(UserId::new(7)),
                    name: String::from("alice"),
                    avatar: String::new(),
                },
                String::from("hi"),
                String::from("https://discord.com/channels/1/2/3"),
                100.0,
                3,
                ChannelId::new(2),
            ),
        );
        config
    }

    #[test]
    fn below_threshold_without_entry_is_skipped() {
        let config = LadderConfig::default(); // threshold 3
        assert_eq!(decide(&config, "123", 2), Decision::Skip);
        assert_eq!(decide(&config, "123", 0), Decision::Skip);
    }

    #[test]
    fn first_threshold_crossing_promotes() {
        let config = LadderConfig::default();
        assert_eq!(decide(&config, "123", 3), Decision::Promote);
        assert_eq!(decide(&config, "123", 50), Decision::Promote);
    }

    #[test]
    fn promoted_messages_refresh_and_never_promote_twice() {
        let config = promoted_config("123");
        assert_eq!(decide(&config, "123", 10), Decision::Refresh);
        // Other messages are unaffected by the existing entry:
        assert_eq!(decide(&config, "124", 10), Decision::Promote);
    }

    #[test]
    fn entries_refresh_even_below_the_threshold() {
        let config = promoted_config("123");
        assert_eq!(decide(&config, "123", 0), Decision::Refresh);
    }
}
