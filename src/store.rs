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
use crate::config::LadderConfig;
use crate::Error;
use redis::AsyncCommands;
use std::path::{Path, PathBuf};
use std::{env, fs};

/// Where the ladder state lives when no explicit path is configured.
const DEFAULT_DATA_PATH: &str = "ladder_data.json";

/// Redis key holding the whole serialized ladder state.
const REDIS_KEY: &str = "ladder_data";

/**
 * Persistence backend for the ladder state.
 *
 * Both backends store the state wholesale: one pretty-printed JSON document, rewritten after
 * every mutation. There are no partial writes and no transactions; the last save wins.
 */
pub enum Store {
    /// A local JSON file, as the original deployment used.
    File { path: PathBuf },
    /// A remote Redis instance, for deployments without a persistent disk.
    Redis {
        conn: redis::aio::MultiplexedConnection,
        key: String,
    },
}

/**
 * The file path used by the file backend, and checked for legacy data by the Redis one.
 */
fn data_path() -> PathBuf {
    env::var("KUDOS_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

fn read_file(path: &Path) -> Result<Option<LadderConfig>, Error> {
    if fs::metadata(path).is_err() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&json)?))
}

impl Store {
    /**
     * Selects the backend from the environment: when `REDIS_URL` is set the state lives in
     * Redis, otherwise in a local JSON file (path overridable through `KUDOS_DATA_PATH`).
     *
     * The Redis connection is established here, so an unreachable store fails the startup
     * instead of the first reaction event.
     */
    pub async fn from_env() -> Result<Store, Error> {
        match env::var("REDIS_URL") {
            Ok(url) => {
                let client = redis::Client::open(url)?;
                let conn = client.get_multiplexed_async_connection().await?;
                Ok(Store::Redis {
                    conn,
                    key: String::from(REDIS_KEY),
                })
            }
            Err(_) => Ok(Store::File { path: data_path() }),
        }
    }

    /**
     * Loads the persisted ladder state, if any was ever saved.
     */
    pub async fn load(&self) -> Result<Option<LadderConfig>, Error> {
        match self {
            Store::File { path } => read_file(path),
            Store::Redis { conn, key } => {
                let mut conn = conn.clone();
                let json: Option<String> = conn.get(key).await?;
                match json {
                    Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                    None => Ok(None),
                }
            }
        }
    }

    /**
     * Loads the ladder state, falling back to defaults for a first run.
     *
     * An empty Redis store is seeded once from the legacy local file when one exists, so a
     * deployment can move off the file backend without losing its promoted table.
     */
    pub async fn load_or_default(&self) -> Result<LadderConfig, Error> {
        if let Some(config) = self.load().await? {
            return Ok(config);
        }

        if let Store::Redis { .. } = self {
            let legacy = data_path();
            if let Some(config) = read_file(&legacy)? {
                self.save(&config).await?;
                eprintln!(
                    "Migrated ladder state from {} into Redis.",
                    legacy.display()
                );
                return Ok(config);
            }
        }

        Ok(LadderConfig::default())
    }

    /**
     * Persists the whole ladder state.
     */
    pub async fn save(&self, config: &LadderConfig) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(config)?;
        match self {
            Store::File { path } => fs::write(path, json)?,
            Store::Redis { conn, key } => {
                let mut conn = conn.clone();
                conn.set::<_, _, ()>(key, json).await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::all::ChannelId;

    #[tokio::test]
    async fn file_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::File {
            path: dir.path().join("ladder_data.json"),
        };

        let mut config = LadderConfig::default();
        config.ladder_channel_id = Some(ChannelId::new(42));
        config.set_threshold(7);
        store.save(&config).await.unwrap();

        let reloaded = store.load().await.unwrap().unwrap();
        assert_eq!(reloaded.ladder_channel_id, Some(ChannelId::new(42)));
        assert_eq!(reloaded.threshold, 7);
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::File {
            path: dir.path().join("never_written.json"),
        };

        assert!(store.load().await.unwrap().is_none());
        let config = store.load_or_default().await.unwrap();
        assert_eq!(config.threshold, 3);
        assert!(config.promoted.is_empty());
    }
}
