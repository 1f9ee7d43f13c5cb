//! `/lang`: interactive UI language switch.

use super::console::Console;
use super::input::{LineSource, ask};
use crate::i18n::{Locale, get_message, language_name};
use crate::session::LocaleContext;
use std::io;

/// Resolve a menu answer: a 1-based index into [`Locale::ALL`] or a locale code.
fn parse_choice(answer: &str) -> Option<Locale> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| Locale::ALL.get(i).copied());
    }
    Locale::from_code(answer)
}

/// List the available locales, read a choice and apply it to `ctx`.
pub async fn handle_lang_command(
    console: &Console,
    input: &mut dyn LineSource,
    ctx: &mut LocaleContext,
) -> io::Result<()> {
    let current = language_name(ctx.locale.code());
    console.println(get_message(
        "lang_current",
        ctx.locale,
        &[("language", current.as_str())],
    ))?;
    for (i, locale) in Locale::ALL.iter().enumerate() {
        console.println(format!(
            "  {}. {} ({})",
            i + 1,
            language_name(locale.code()),
            locale.code()
        ))?;
    }

    let prompt = get_message("lang_prompt", ctx.locale, &[]);
    let Some(answer) = ask(console, input, &prompt).await? else {
        return Ok(());
    };
    let answer = answer.trim();

    if answer.is_empty() {
        return console.println(get_message("lang_unchanged", ctx.locale, &[]));
    }

    match parse_choice(answer) {
        Some(locale) if locale == ctx.locale => {
            console.println(get_message("lang_unchanged", ctx.locale, &[]))
        }
        Some(locale) => {
            ctx.set_locale(locale);
            tracing::debug!(locale = %locale, "UI language changed");
            let name = language_name(locale.code());
            console.println(get_message(
                "lang_changed",
                locale,
                &[("language", name.as_str())],
            ))
        }
        None => console.println(get_message("lang_invalid", ctx.locale, &[("input", answer)])),
    }
}
