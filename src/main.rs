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
mod commands;
mod config;
mod ladder;
mod leaderboard;
mod render;
mod store;
mod utils;

use crate::config::LadderConfig;
use crate::store::Store;
use poise::serenity_prelude as serenity;
use std::env;
use tokio::sync::Mutex;

/* Poise-required data types: */

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;
// User data:
pub struct Data {
    /// The ladder state, loaded once at startup and injected into every handler.
    pub ladder: Mutex<LadderConfig>,
    /// Backend the state is persisted through after every mutation.
    pub store: Store,
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        // Ready (bot is started):
        serenity::FullEvent::Ready { data_about_bot, .. } => {
            match data_about_bot.user.discriminator {
                Some(discriminator) => {
                    println!(
                        "{}#{discriminator:#?} is connected.",
                        data_about_bot.user.name
                    )
                }
                None => println!("{} is connected.", data_about_bot.user.name),
            }

            ctx.set_presence(None, serenity::OnlineStatus::Online);
        }
        // A reaction was added to some message:
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            // The bot's own reactions never count towards promotion:
            let own_id = ctx.cache.current_user().id;
            if add_reaction.user_id == Some(own_id) {
                return Ok(());
            }
            handle_reaction_change(ctx, data, add_reaction).await?;
        }
        // A reaction was removed from some message:
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            handle_reaction_change(ctx, data, removed_reaction).await?;
        }

        _ => {}
    }

    Ok(())
}

/**
 * Shared path for reaction additions and removals: filter out events the ladder does not
 * track, re-count the matching reactions on the affected message and let the promotion
 * engine act on the new count.
 */
async fn handle_reaction_change(
    ctx: &serenity::Context,
    data: &Data,
    reaction: &serenity::Reaction,
) -> Result<(), Error> {
    // The ladder only tracks guild messages:
    if reaction.guild_id.is_none() {
        return Ok(());
    }

    // Compare against the configured emoji before fetching anything:
    let emoji = data.ladder.lock().await.emoji.clone();
    if reaction.emoji.to_string() != emoji {
        return Ok(());
    }

    let msg = reaction.message(ctx).await?;
    let count = ladder::count_matching_reactions(&msg, &emoji);
    ladder::post_or_update(ctx, data, &msg, count).await
}

#[tokio::main]
async fn main() {
    let token = env::var("DISCORD_TOKEN")
        .expect("Discord token not provided (in DISCORD_TOKEN environmental variable).");
    let intents = serenity::GatewayIntents::default()
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MESSAGE_REACTIONS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ladderconfig::ladder(),
                commands::top::top(),
                commands::top::topauthors(),
                commands::license::license(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands)
                    .await
                    .expect("Could not register the commands.");

                // An unreachable store should abort the startup, not the first event:
                let store = Store::from_env().await?;
                let ladder = store.load_or_default().await?;

                Ok(Data {
                    ladder: Mutex::new(ladder),
                    store,
                })
            })
        })
        .build();

    let mut client = serenity::Client::builder(token, intents)
        .framework(framework) // For command handling, using poise.
        .await
        .expect("Could not create the Discord bot client object.");

    client.start().await.expect("The Discord bot crashed.");
}
