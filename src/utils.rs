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

/**
 * Macro for logging to stderr the usage of a command.
 */
macro_rules! elog_cmd {
    ($ctx:ident) => {
        eprintln!(
            "Executing command `{}`, triggered by <@{}> ({}).",
            $ctx.invocation_string(),
            $ctx.author().id,
            $ctx.author().tag()
        );
    };
}
pub(crate) use elog_cmd;

/**
 * Whether a serenity error is Discord telling us the requested entity no longer exists.
 *
 * This is the only error class the promotion engine recovers from: a deleted ladder repost
 * is recreated in place.
 */
pub fn is_not_found(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(serenity::http::HttpError::UnsuccessfulRequest(resp))
            if resp.status_code == serenity::http::StatusCode::NOT_FOUND
    )
}

/**
 * Truncates a message snippet to at most `max_chars` characters, appending an ellipsis when
 * something was cut. Operates on characters, not bytes, so multi-byte text stays valid.
 */
pub fn truncate(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let mut truncated: String = content.chars().take(max_chars).collect();
        truncated.push('…');
        truncated
    }
}
