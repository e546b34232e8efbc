// Query operations - visible bus list with search, date filter and voice input

use crate::cli::{ListArgs, ListFormat};
use crate::commands::open_board;
use crate::config::Config;
use crate::core::policy::Action;
use crate::core::traits::Dictation;
use crate::dictation;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::output::DisplayFormatter;
use crate::utils::OutputStyle;
use tracing::debug;

pub fn handle_list_command(config: &Config, args: &ListArgs) -> AppResult<()> {
    let board = open_board(config)?;

    let query = if args.voice {
        let recognizer = dictation::from_command(config.general.dictation_cmd.as_deref());
        match listen_for_query(recognizer.as_ref(), args, config)? {
            Some(heard) => heard,
            None => {
                handle_flow(FlowResult::Cancelled("Nothing was heard".to_string()));
                return Ok(());
            }
        }
    } else {
        args.query.clone().unwrap_or_default()
    };

    let filter = args.date.unwrap_or(config.general.default_filter);
    let buses = board.visible_buses(&query, filter);
    debug!(query = %query, %filter, shown = buses.len(), "Derived visible buses");

    let format = args.format.as_ref().unwrap_or(&ListFormat::Simple);
    if buses.is_empty() && *format != ListFormat::Json {
        handle_flow(FlowResult::EmptyList {
            item_type: format!("buses for {}", filter),
        });
        return Ok(());
    }

    DisplayFormatter::format_list(&buses, format)?;

    if *format != ListFormat::Json
        && let Some(user) = board.current_user()
    {
        let hint = if board.can(Action::CreateBus) {
            "report status with `chalobus status`, or manage buses with add/edit/delete"
        } else {
            "report what you see with `chalobus status <bus> <status>`"
        };
        println!(
            "\n{}",
            OutputStyle::muted(&format!("Hi {}! {}", user.name, hint))
        );
    }

    Ok(())
}

fn listen_for_query(
    recognizer: &dyn Dictation,
    args: &ListArgs,
    config: &Config,
) -> AppResult<Option<String>> {
    let language = args.lang.unwrap_or(config.general.language);
    println!(
        "🎤 {}",
        OutputStyle::info(&format!("Listening ({})...", language.locale_tag()))
    );
    let mut transcript = recognizer.start_dictation(language)?;
    Ok(transcript.next())
}
