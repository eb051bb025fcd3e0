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
/*
 * The project is a library solely because procedural macros must live in a proc-macro crate;
 * the bot itself is the binary target.
 */
extern crate proc_macro;
use proc_macro::TokenStream;
use quote::quote;
use quote::ToTokens as _; // To use function.into_token_stream().
use syn::spanned::Spanned as _; // To use span() on language items.
use syn::{parse_macro_input, ItemFn};

/**
 * Extracts the identifier of the first argument of a command function, which is expected to be
 * the poise `Context` object.
 */
fn context_ident(function: &ItemFn) -> Result<syn::Ident, darling::Error> {
    let Some(first_arg) = function.sig.inputs.first() else {
        return Err(darling::Error::from(syn::Error::new(
            function.sig.span(),
            "[log_cmd] function must take the command context as its first argument",
        )));
    };
    let syn::FnArg::Typed(ctx_arg) = first_arg else {
        // syn::FnArg::Receiver(_)
        return Err(darling::Error::from(syn::Error::new(
            first_arg.span(),
            "[log_cmd] `self` argument is not allowed",
        )));
    };
    let syn::Pat::Ident(ident) = &*ctx_arg.pat else {
        return Err(darling::Error::from(syn::Error::new(
            ctx_arg.pat.span(),
            "[log_cmd] expected an identifier",
        )));
    };
    Ok(ident.ident.clone())
}

/**
 * Attribute macro that prepends a command function with a statement logging its invocation
 * (command string and triggering user) to stderr, through `crate::utils::elog_cmd!`.
 */
#[proc_macro_attribute]
pub fn log_cmd(_macro_attrs: TokenStream, function: TokenStream) -> TokenStream {
    let mut function = parse_macro_input!(function as ItemFn);

    let ctx_ident = match context_ident(&function) {
        Ok(ident) => ident,
        Err(e) => return e.write_errors().into(),
    };

    // Insert the logging statement at the beginning of the function's body:
    function.block.stmts.insert(
        0,
        syn::parse(
            quote! {
            crate::utils::elog_cmd!(#ctx_ident);
            }
            .into(),
        )
        .unwrap(),
    );

    function.into_token_stream().into()
}
