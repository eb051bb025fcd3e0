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
use getset::Getters;
use serenity::all::UserId;
use std::collections::HashMap;

/// Number of rows shown on a leaderboard when the caller does not ask for a specific amount.
pub const DEFAULT_LIMIT: usize = 10;

/**
 * Key under which a promoted message is attributed to its author.
 *
 * Entries written before the author-ID snapshot existed only carry a display name; those are
 * grouped under an explicitly tagged name key, so they can never collide with a numeric ID.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum AuthorKey {
    ById(UserId),
    ByName(String),
}

impl AuthorKey {
    pub fn for_entry(entry: &PromotedEntry) -> AuthorKey {
        match entry.author_id {
            Some(id) => AuthorKey::ById(id),
            None => AuthorKey::ByName(entry.author_name.clone()),
        }
    }

    /**
     * A Discord mention for the author, when the key is an actual user ID.
     */
    pub fn mention(&self) -> Option<String> {
        match self {
            AuthorKey::ById(id) => Some(format!("<@{}>", id)),
            AuthorKey::ByName(_) => None,
        }
    }
}

/**
 * Aggregated score of one author over all their promoted messages.
 */
#[cfg_attr(debug_assertions, derive(Debug))]
#[derive(Getters)]
pub struct AuthorStats {
    /// Display name, as seen on the latest entry processed.
    #[getset(get = "pub")]
    name: String,
    /// Avatar URL; empty if no entry carried one.
    #[getset(get = "pub")]
    avatar: String,
    /// One point per matching reaction, summed over all promoted messages.
    #[getset(get = "pub")]
    points: u64,
    /// Number of promoted messages.
    #[getset(get = "pub")]
    msgs: u32,
    /// Highest reaction count on a single promoted message.
    #[getset(get = "pub")]
    best_single: u64,
    /// Oldest promoted-message timestamp, used as the final tie-breaker.
    #[getset(get = "pub")]
    first_ts: f64,
    // Newest entry timestamps seen so far, deciding which identity snapshot wins. Map
    // iteration order is arbitrary, so "latest processed" would not be deterministic.
    last_name_ts: f64,
    last_avatar_ts: f64,
}

/**
 * Ranks the promoted messages: highest reaction count first, ties broken by the older
 * message winning.
 */
pub fn top_messages(promoted: &HashMap<String, PromotedEntry>, limit: usize) -> Vec<&PromotedEntry> {
    let mut entries: Vec<&PromotedEntry> = promoted.values().collect();
    entries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.timestamp.total_cmp(&b.timestamp))
    });
    entries.truncate(limit);
    entries
}

/**
 * Ranks the authors of promoted messages by accumulated points (1 point = 1 matching
 * reaction), with best single post and seniority as tie-breakers.
 */
pub fn top_authors(
    promoted: &HashMap<String, PromotedEntry>,
    limit: usize,
) -> Vec<(AuthorKey, AuthorStats)> {
    let mut by_author: HashMap<AuthorKey, AuthorStats> = HashMap::new();

    for entry in promoted.values() {
        let stats = by_author
            .entry(AuthorKey::for_entry(entry))
            .or_insert_with(|| AuthorStats {
                name: entry.author_name.clone(),
                avatar: String::new(),
                points: 0,
                msgs: 0,
                best_single: 0,
                first_ts: entry.timestamp,
                last_name_ts: f64::NEG_INFINITY,
                last_avatar_ts: f64::NEG_INFINITY,
            });

        stats.points += entry.count;
        stats.msgs += 1;
        stats.best_single = stats.best_single.max(entry.count);
        stats.first_ts = stats.first_ts.min(entry.timestamp);
        // The identity snapshot comes from the author's newest message: the name from the
        // newest entry, the avatar from the newest entry that carries one.
        if entry.timestamp >= stats.last_name_ts {
            stats.last_name_ts = entry.timestamp;
            stats.name = entry.author_name.clone();
        }
        if !entry.author_avatar.is_empty() && entry.timestamp >= stats.last_avatar_ts {
            stats.last_avatar_ts = entry.timestamp;
            stats.avatar = entry.author_avatar.clone();
        }
    }

    let mut board: Vec<(AuthorKey, AuthorStats)> = by_author.into_iter().collect();
    board.sort_by(|(_, a), (_, b)| {
        b.points
            .cmp(&a.points)
            .then(b.best_single.cmp(&a.best_single))
            .then(a.first_ts.total_cmp(&b.first_ts))
    });
    board.truncate(limit);
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthorSnapshot;
    use serenity::all::{ChannelId, MessageId};

    fn entry(key: u64, author: Option<u64>, name: &str, count: u64, timestamp: f64) -> (String, PromotedEntry) {
        let snapshot = AuthorSnapshot {
            id: author.map(UserId::new),
            name: name.to_string(),
            avatar: format!("https://cdn.example/{}.png", name),
        };
        (
            key.to_string(),
            PromotedEntry::new(
                MessageId::new(key + 1),
                snapshot,
                format!("message {}", key),
                format!("https://discord.com/channels/1/2/{}", key),
                timestamp,
                count,
                ChannelId::new(2),
            ),
        )
    }

    #[test]
    fn messages_rank_by_count_then_age() {
        let promoted: HashMap<_, _> = [
            entry(1, Some(10), "alice", 5, 200.0),
            entry(2, Some(11), "bob", 5, 100.0),
            entry(3, Some(12), "carol", 3, 300.0),
        ]
        .into_iter()
        .collect();

        let ranked = top_messages(&promoted, 10);
        let timestamps: Vec<f64> = ranked.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn messages_are_truncated_to_the_requested_limit() {
        let promoted: HashMap<_, _> = (0..15u64)
            .map(|i| entry(i, Some(10), "alice", i, i as f64))
            .collect();

        assert_eq!(top_messages(&promoted, 10).len(), 10);
        assert!(top_messages(&HashMap::new(), 10).is_empty());
    }

    #[test]
    fn author_points_accumulate_over_their_messages() {
        let promoted: HashMap<_, _> = [
            entry(1, Some(10), "alice", 4, 100.0),
            entry(2, Some(10), "alice", 7, 200.0),
            entry(3, Some(11), "bob", 5, 50.0),
        ]
        .into_iter()
        .collect();

        let board = top_authors(&promoted, 10);
        assert_eq!(board.len(), 2);

        let (key, stats) = &board[0];
        assert_eq!(*key, AuthorKey::ById(UserId::new(10)));
        assert_eq!(*stats.points(), 11);
        assert_eq!(*stats.msgs(), 2);
        assert_eq!(*stats.best_single(), 7);
        assert_eq!(*stats.first_ts(), 100.0);
    }

    #[test]
    fn authors_tie_break_on_best_single_then_seniority() {
        // Both authors have 9 points; bob's best single post is higher.
        let promoted: HashMap<_, _> = [
            entry(1, Some(10), "alice", 5, 100.0),
            entry(2, Some(10), "alice", 4, 150.0),
            entry(3, Some(11), "bob", 9, 900.0),
        ]
        .into_iter()
        .collect();

        let board = top_authors(&promoted, 10);
        assert_eq!(*board[0].1.name(), "bob");
    }

    #[test]
    fn identity_snapshot_comes_from_the_newest_entry() {
        let old_name = (
            String::from("1"),
            PromotedEntry::new(
                MessageId::new(2),
                AuthorSnapshot {
                    id: Some(UserId::new(10)),
                    name: String::from("alice_old"),
                    avatar: String::from("https://cdn.example/alice_old.png"),
                },
                String::from("old"),
                String::from("https://discord.com/channels/1/2/1"),
                100.0,
                4,
                ChannelId::new(2),
            ),
        );
        // The newer entry has the current name but no avatar snapshot.
        let new_name = (
            String::from("3"),
            PromotedEntry::new(
                MessageId::new(4),
                AuthorSnapshot {
                    id: Some(UserId::new(10)),
                    name: String::from("alice_new"),
                    avatar: String::new(),
                },
                String::from("new"),
                String::from("https://discord.com/channels/1/2/3"),
                200.0,
                5,
                ChannelId::new(2),
            ),
        );

        // Whichever order the map yields them in, the name comes from the newest entry
        // and the avatar from the newest entry that has one.
        for promoted in [
            [old_name.clone(), new_name.clone()],
            [new_name.clone(), old_name.clone()],
        ] {
            let promoted: HashMap<_, _> = promoted.into_iter().collect();
            let board = top_authors(&promoted, 10);
            assert_eq!(*board[0].1.name(), "alice_new");
            assert_eq!(*board[0].1.avatar(), "https://cdn.example/alice_old.png");
        }
    }

    #[test]
    fn nameless_ids_and_id_less_names_never_collide() {
        // One entry with no author ID falls back to a tagged name key.
        let promoted: HashMap<_, _> = [
            entry(1, Some(10), "alice", 4, 100.0),
            entry(2, None, "alice", 3, 200.0),
        ]
        .into_iter()
        .collect();

        let board = top_authors(&promoted, 10);
        assert_eq!(board.len(), 2);
        assert!(board
            .iter()
            .any(|(key, _)| *key == AuthorKey::ByName(String::from("alice"))));
    }

    #[test]
    fn mention_exists_only_for_real_ids() {
        assert_eq!(
            AuthorKey::ById(UserId::new(10)).mention(),
            Some(String::from("<@10>"))
        );
        assert_eq!(AuthorKey::ByName(String::from("alice")).mention(), None);
    }
}
