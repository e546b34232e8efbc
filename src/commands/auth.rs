// Account operations - register, login, logout, profile

use crate::cli::{LoginArgs, ProfileArgs, RegisterArgs};
use crate::commands::open_board;
use crate::config::Config;
use crate::core::session::{ProfileUpdate, RegistrationForm};
use crate::utils::error::{handle_flow, AppResult, FlowResult};
use crate::utils::{self, OutputStyle};

/// Use the flag value or ask for it; `None` means the user gave up
fn value_or_prompt(value: &Option<String>, label: &str) -> AppResult<Option<String>> {
    match value {
        Some(v) => Ok(Some(v.clone())),
        None => utils::prompt_required(&format!("{}: ", OutputStyle::label(label))),
    }
}

fn password_or_prompt(value: &Option<String>) -> AppResult<Option<String>> {
    match value {
        Some(v) => Ok(Some(v.clone())),
        None => utils::prompt_secret(&format!("{}: ", OutputStyle::label("Password"))),
    }
}

pub fn handle_register_command(config: &Config, args: &RegisterArgs) -> AppResult<()> {
    let mut board = open_board(config)?;

    let Some(name) = value_or_prompt(&args.name, "Full name")? else {
        handle_flow(FlowResult::Cancelled("Registration cancelled".to_string()));
        return Ok(());
    };
    let Some(phone) = value_or_prompt(&args.phone, "Phone number")? else {
        handle_flow(FlowResult::Cancelled("Registration cancelled".to_string()));
        return Ok(());
    };
    let Some(password) = password_or_prompt(&args.password)? else {
        handle_flow(FlowResult::Cancelled("Registration cancelled".to_string()));
        return Ok(());
    };

    let profile = board.register(RegistrationForm {
        name,
        phone,
        password,
        role: args.role,
    })?;

    handle_flow(FlowResult::Success(format!(
        "Registration successful for {} ({}). Please log in now.",
        profile.name, profile.role
    )));
    Ok(())
}

pub fn handle_login_command(config: &Config, args: &LoginArgs) -> AppResult<()> {
    let mut board = open_board(config)?;

    let Some(phone) = value_or_prompt(&args.phone, "Phone number")? else {
        handle_flow(FlowResult::Cancelled("Login cancelled".to_string()));
        return Ok(());
    };
    let Some(password) = password_or_prompt(&args.password)? else {
        handle_flow(FlowResult::Cancelled("Login cancelled".to_string()));
        return Ok(());
    };

    let user = board.login(&phone, &password)?;
    handle_flow(FlowResult::Success(format!(
        "Welcome, {}! Signed in as {}.",
        user.name, user.role
    )));
    Ok(())
}

pub fn handle_logout_command(config: &Config) -> AppResult<()> {
    let mut board = open_board(config)?;
    board.logout();
    handle_flow(FlowResult::Success("Signed out".to_string()));
    Ok(())
}

pub fn handle_whoami_command(config: &Config) -> AppResult<()> {
    let board = open_board(config)?;
    match board.current_user() {
        Some(user) => {
            println!(
                "{} {}",
                OutputStyle::header(&user.name),
                OutputStyle::info(&format!("({} active)", user.role))
            );
        }
        None => println!("{}", OutputStyle::muted("Not signed in")),
    }
    Ok(())
}

pub fn handle_profile_command(config: &Config, args: &ProfileArgs) -> AppResult<()> {
    let mut board = open_board(config)?;

    let update = ProfileUpdate {
        name: args.name.clone(),
        phone: args.phone.clone(),
        password: args.password.clone(),
        photo_url: args.photo.clone(),
    };

    if update.is_empty() {
        // Nothing to change: just show the profile
        match board.current_user() {
            Some(user) => OutputStyle::print_profile(user),
            None => println!("{}", OutputStyle::muted("Not signed in")),
        }
        return Ok(());
    }

    let user = board.update_profile(update)?;
    OutputStyle::print_profile(user);
    handle_flow(FlowResult::Success("Profile saved".to_string()));
    Ok(())
}
