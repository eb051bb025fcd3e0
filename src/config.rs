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
use serde::{Deserialize, Serialize};
use serenity::all::{ChannelId, MessageId, RoleId, UserId};
use std::collections::HashMap;

/* Data structures: */

/**
 * Data structure encapsulating the whole persistent state of the ladder: the mutable settings,
 * plus the table of already-promoted messages.
 *
 * The state is serialized wholesale into a single JSON object after every mutation; see
 * `crate::store`.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LadderConfig {
    /// The channel where promoted messages are reposted, once configured.
    pub ladder_channel_id: Option<ChannelId>,
    /// The single reaction emoji the ladder tracks.
    pub emoji: String,
    /// Minimum reaction count required for a message's first promotion.
    pub threshold: u32,
    /// Role allowed to change the ladder settings, besides guild managers.
    pub admin_role_id: Option<RoleId>,
    /// Table of promoted messages, keyed by the original message's ID.
    pub promoted: HashMap<String, PromotedEntry>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            ladder_channel_id: None,
            emoji: String::from("💪"),
            threshold: 3,
            admin_role_id: None,
            promoted: HashMap::new(),
        }
    }
}

impl LadderConfig {
    /**
     * Sets the promotion threshold, clamped to a minimum of 1.
     *
     * A threshold of 0 would promote every message on its first tracked reaction removal,
     * so it is not representable.
     */
    pub fn set_threshold(&mut self, value: i64) {
        self.threshold = value.clamp(1, i64::from(u32::MAX)) as u32;
    }
}

/**
 * Snapshot of a message author's identity, as last observed.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(Clone)]
pub struct AuthorSnapshot {
    pub id: Option<UserId>,
    pub name: String,
    pub avatar: String,
}

/**
 * A message promoted into the ladder channel, and the snapshot of its original shown there.
 *
 * Entries are created once per original message and then only refreshed; they are never
 * removed, even if the reaction count later falls below the promotion threshold.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(Clone, Deserialize, Serialize)]
pub struct PromotedEntry {
    /// The repost in the ladder channel (1:1 with this entry; recreated if deleted externally).
    pub ladder_msg_id: MessageId,
    /// May be absent in data predating the author-ID snapshot.
    #[serde(default)]
    pub author_id: Option<UserId>,
    pub author_name: String,
    pub author_avatar: String,
    pub content: String,
    /// Permalink to the original message.
    pub url: String,
    /// Original message creation time, in seconds since the Unix epoch.
    pub timestamp: f64,
    /// Last observed count of matching reactions on the original message.
    pub count: u64,
    /// The channel the original message lives in.
    pub channel_id: ChannelId,
}

impl PromotedEntry {
    pub fn new(
        ladder_msg_id: MessageId,
        author: AuthorSnapshot,
        content: String,
        url: String,
        timestamp: f64,
        count: u64,
        channel_id: ChannelId,
    ) -> Self {
        Self {
            ladder_msg_id,
            author_id: author.id,
            author_name: author.name,
            author_avatar: author.avatar,
            content,
            url,
            timestamp,
            count,
            channel_id,
        }
    }

    /**
     * Refreshes the mutable parts of the snapshot after a reaction change: the author's
     * identity, the message text and the reaction count.
     *
     * `url`, `timestamp` and `channel_id` are facts about the original message and never
     * change; `ladder_msg_id` only changes through the recreation path.
     */
    pub fn refresh(&mut self, author: AuthorSnapshot, content: String, count: u64) {
        self.author_id = author.id;
        self.author_name = author.name;
        self.author_avatar = author.avatar;
        self.content = content;
        self.count = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> AuthorSnapshot {
        AuthorSnapshot {
            id: Some(UserId::new(77)),
            name: name.to_string(),
            avatar: String::from("https://cdn.example/a.png"),
        }
    }

    #[test]
    fn defaults_match_the_original_bot() {
        let config = LadderConfig::default();
        assert_eq!(config.emoji, "💪");
        assert_eq!(config.threshold, 3);
        assert!(config.ladder_channel_id.is_none());
        assert!(config.admin_role_id.is_none());
        assert!(config.promoted.is_empty());
    }

    #[test]
    fn threshold_is_clamped_to_at_least_one() {
        let mut config = LadderConfig::default();
        config.set_threshold(0);
        assert_eq!(config.threshold, 1);
        config.set_threshold(-5);
        assert_eq!(config.threshold, 1);
        config.set_threshold(12);
        assert_eq!(config.threshold, 12);
    }

    #[test]
    fn refresh_keeps_the_original_message_facts() {
        let mut entry = PromotedEntry::new(
            MessageId::new(10),
            snapshot("alice"),
            String::from("first draft"),
            String::from("https://discord.com/channels/1/2/3"),
            1_700_000_000.0,
            3,
            ChannelId::new(2),
        );

        entry.refresh(snapshot("alice (renamed)"), String::from("edited"), 2);

        assert_eq!(entry.count, 2);
        assert_eq!(entry.author_name, "alice (renamed)");
        assert_eq!(entry.content, "edited");
        // Facts about the original message stay put:
        assert_eq!(entry.url, "https://discord.com/channels/1/2/3");
        assert_eq!(entry.timestamp, 1_700_000_000.0);
        assert_eq!(entry.channel_id, ChannelId::new(2));
        assert_eq!(entry.ladder_msg_id, MessageId::new(10));
    }

    #[test]
    fn parses_state_written_by_the_previous_implementation() {
        // Numeric IDs and no explicit author_id tagging, as the pre-migration files had.
        let json = r#"{
            "ladder_channel_id": 111222333,
            "emoji": "🔥",
            "threshold": 5,
            "promoted": {
                "900": {
                    "ladder_msg_id": 901,
                    "author_id": 42,
                    "author_name": "bob",
                    "author_avatar": "https://cdn.example/b.png",
                    "content": "hello",
                    "url": "https://discord.com/channels/1/2/900",
                    "timestamp": 1690000000.5,
                    "count": 6,
                    "channel_id": 2
                }
            }
        }"#;

        let config: LadderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.threshold, 5);
        assert_eq!(config.emoji, "🔥");
        assert_eq!(config.ladder_channel_id, Some(ChannelId::new(111222333)));
        // Missing fields fall back to defaults:
        assert!(config.admin_role_id.is_none());

        let entry = &config.promoted["900"];
        assert_eq!(entry.author_id, Some(UserId::new(42)));
        assert_eq!(entry.count, 6);
    }

    #[test]
    fn entry_without_author_id_still_parses() {
        let json = r#"{
            "ladder_msg_id": 901,
            "author_name": "ghost",
            "author_avatar": "",
            "content": "",
            "url": "https://discord.com/channels/1/2/900",
            "timestamp": 0.0,
            "count": 1,
            "channel_id": 2
        }"#;

        let entry: PromotedEntry = serde_json::from_str(json).unwrap();
        assert!(entry.author_id.is_none());
    }
}
