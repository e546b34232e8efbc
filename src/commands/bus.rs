// Bus operations - show, add, edit, status, delete

use crate::cli::{AddArgs, DeleteArgs, EditArgs, ShowArgs, StatusArgs};
use crate::commands::open_board;
use crate::config::Config;
use crate::core::data::{BusInput, BusStatus};
use crate::core::policy::Action;
use crate::utils::delay::parse_delay;
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::{self, print_warning, OutputStyle};

pub fn handle_show_command(config: &Config, args: &ShowArgs) -> AppResult<()> {
    let board = open_board(config)?;
    let bus = board.resolve(&args.identifier)?;
    OutputStyle::print_bus_detailed(bus);
    Ok(())
}

pub fn handle_add_command(config: &Config, args: &AddArgs) -> AppResult<()> {
    let mut board = open_board(config)?;
    board.check(Action::CreateBus)?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => utils::prompt_input(&format!("{}: ", OutputStyle::label("Bus name")))?,
    };
    let number = match &args.number {
        Some(number) => number.clone(),
        None => utils::prompt_input(&format!("{}: ", OutputStyle::label("Bus number")))?,
    };
    let stops = match &args.stops {
        Some(stops) => stops.clone(),
        None => utils::prompt_input(&format!(
            "{} {}: ",
            OutputStyle::label("Stops"),
            OutputStyle::muted("(comma separated)")
        ))?,
    };

    let input = BusInput {
        name,
        number,
        stops,
        available_tomorrow: args.tomorrow,
        available_next7_days: args.next_week,
    };
    let bus = board.create_bus(&input)?;

    OutputStyle::print_bus_basic(&bus);
    handle_flow(FlowResult::Success(format!("Bus '{}' added", bus.name)));
    Ok(())
}

pub fn handle_edit_command(config: &Config, args: &EditArgs) -> AppResult<()> {
    let mut board = open_board(config)?;
    board.check(Action::EditBus)?;

    let existing = board.resolve(&args.identifier)?;
    let id = existing.id.clone();
    let mut input = BusInput::from_record(existing);

    if let Some(name) = &args.name {
        input.name = name.clone();
    }
    if let Some(number) = &args.number {
        input.number = number.clone();
    }
    if let Some(stops) = &args.stops {
        input.stops = stops.clone();
    }
    if let Some(tomorrow) = args.tomorrow {
        input.available_tomorrow = tomorrow;
    }
    if let Some(next_week) = args.next_week {
        input.available_next7_days = next_week;
    }

    let bus = board.edit_bus(&id, &input)?;
    OutputStyle::print_bus_basic(&bus);
    handle_flow(FlowResult::Success(format!("Bus '{}' updated", bus.name)));
    Ok(())
}

pub fn handle_status_command(config: &Config, args: &StatusArgs) -> AppResult<()> {
    let mut board = open_board(config)?;
    board.check(Action::UpdateStatus)?;

    let id = board.resolve(&args.identifier)?.id.clone();
    let delay = match (&args.delay, args.status) {
        (Some(text), BusStatus::Delayed) => Some(parse_delay(text)?),
        (Some(_), _) => {
            print_warning("--delay only applies to delayed buses; ignoring it");
            None
        }
        (None, _) => None,
    };

    let bus = board.update_status(&id, args.status, delay)?;
    println!(
        "{} {}",
        OutputStyle::bus_name(&bus.name),
        OutputStyle::status(bus.status(), &OutputStyle::status_text(&bus))
    );
    handle_flow(FlowResult::Success("Status reported. Thank you!".to_string()));
    Ok(())
}

pub fn handle_delete_command(config: &Config, args: &DeleteArgs) -> AppResult<()> {
    let mut board = open_board(config)?;
    board.check(Action::DeleteBus)?;

    let bus = board.resolve(&args.identifier)?;
    let id = bus.id.clone();

    println!("Bus to delete:");
    OutputStyle::print_bus_basic(bus);

    if !args.force && !utils::prompt_yes_no("\nAre you sure you want to delete this bus?")? {
        handle_flow(FlowResult::Cancelled("Bus not deleted".to_string()));
        return Ok(());
    }

    let removed = board.delete_bus(&id)?;
    handle_flow(FlowResult::Success(format!("Bus '{}' deleted", removed.name)));
    Ok(())
}
