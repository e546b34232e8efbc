use colored::*;
use crate::cli::ListFormat;
use crate::core::data::{BusRecord, BusStatus, UserProfile};
use crate::utils::error::AppResult;
use crate::utils::format::{format_delay, format_route, truncate_string};
use crate::utils::time_format::{format_clock, format_datetime};

pub struct OutputStyle;

impl OutputStyle {
    pub fn bus_name(text: &str) -> ColoredString {
        text.bright_green().bold()
    }

    pub fn number(text: &str) -> ColoredString {
        text.bright_yellow()
    }

    pub fn content(text: &str) -> ColoredString {
        text.clear()
    }

    pub fn stops(text: &str) -> ColoredString {
        text.bright_cyan()
    }

    pub fn title(text: &str) -> ColoredString {
        text.bright_blue().bold()
    }

    pub fn header(text: &str) -> ColoredString {
        text.bold()
    }

    pub fn label(text: &str) -> ColoredString {
        text.cyan()
    }

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    pub fn warning(text: &str) -> ColoredString {
        text.yellow()
    }

    pub fn info(text: &str) -> ColoredString {
        text.blue()
    }

    pub fn muted(text: &str) -> ColoredString {
        text.dimmed()
    }

    pub fn status(status: BusStatus, text: &str) -> ColoredString {
        match status {
            BusStatus::Arrived => text.green().bold(),
            BusStatus::OnTheWay => text.blue().bold(),
            BusStatus::Delayed => text.red().bold(),
        }
    }

    /// Disable colors globally (config `color = false` or NO_COLOR)
    pub fn set_color_enabled(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    // Formatting helpers
    pub fn separator() -> String {
        "─".repeat(50)
    }

    pub fn header_separator() -> String {
        "═".repeat(50)
    }

    pub fn print_header(title: &str) {
        println!("{}", Self::title(title));
        println!("{}", Self::header_separator());
    }

    pub fn print_field_colored(label: &str, value: &str, color_fn: impl Fn(&str) -> ColoredString) {
        println!("{:>12}: {}", Self::label(label), color_fn(value));
    }

    /// Status text as shown on a bus card, e.g. "Delayed (15 min)"
    pub fn status_text(bus: &BusRecord) -> String {
        match bus.status() {
            BusStatus::Delayed => {
                format!("{} ({})", bus.status(), format_delay(bus.delay_minutes()))
            }
            other => other.to_string(),
        }
    }

    pub fn print_bus_basic(bus: &BusRecord) {
        println!("  Bus: {} {}", Self::bus_name(&bus.name), Self::number(&bus.number));
        println!("  Status: {}", Self::status(bus.status(), &Self::status_text(bus)));
        println!("  Route: {}", Self::stops(&format_route(&bus.route_stops)));
    }

    pub fn print_bus_detailed(bus: &BusRecord) {
        println!("{}", Self::title("🚌 Bus Details"));

        Self::print_field_colored("ID", &bus.id, Self::muted);
        Self::print_field_colored("Name", &bus.name, Self::bus_name);
        Self::print_field_colored("Number", &bus.number, Self::number);
        println!(
            "{:>12}: {}",
            Self::label("Status"),
            Self::status(bus.status(), &Self::status_text(bus))
        );
        Self::print_field_colored("Route", &format_route(&bus.route_stops), Self::stops);
        Self::print_field_colored("Tomorrow", yes_no(bus.available_tomorrow), Self::content);
        Self::print_field_colored("Next 7 days", yes_no(bus.available_next7_days), Self::content);
        Self::print_field_colored(
            "Updated by",
            &format!("{} ({})", bus.updated_by, bus.updated_by_role),
            Self::content,
        );
        Self::print_field_colored(
            "Last update",
            &format_datetime(&bus.last_update_time),
            Self::muted,
        );
    }

    /// One-line bus card for the simple list
    pub fn format_bus_line(bus: &BusRecord) -> String {
        format!(
            "{} {} {} {}",
            Self::bus_name(&bus.name),
            Self::number(&format!("[{}]", bus.number)),
            Self::status(bus.status(), &Self::status_text(bus)),
            Self::muted(&format!(
                "· by {} ({}) at {}",
                bus.updated_by,
                bus.updated_by_role,
                format_clock(&bus.last_update_time)
            ))
        )
    }

    pub fn print_profile(user: &UserProfile) {
        println!("{}", Self::title("👤 Profile"));
        Self::print_field_colored("Name", &user.name, Self::content);
        Self::print_field_colored("Phone", &user.phone, Self::content);
        Self::print_field_colored("Role", &user.role.to_string(), Self::info);
        if let Some(photo) = &user.photo_url {
            Self::print_field_colored("Photo", photo, Self::muted);
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "✅ yes" } else { "❌ no" }
}

pub fn print_bus_count(count: usize) {
    if count == 0 {
        println!("{}", OutputStyle::muted("No buses found."));
    } else {
        println!(
            "🚌 {} ({} found)",
            OutputStyle::header("Buses"),
            OutputStyle::info(&count.to_string())
        );
    }
}

pub fn print_warning(message: &str) {
    println!("⚠️  {}", OutputStyle::warning(message));
}

pub fn print_success(message: &str) {
    println!("✅ {}", OutputStyle::success(message));
}

/// Display formatter for different output formats
pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn format_list(buses: &[&BusRecord], format: &ListFormat) -> AppResult<()> {
        match format {
            ListFormat::Simple => Self::print_simple_list(buses),
            ListFormat::Detailed => Self::print_detailed_list(buses),
            ListFormat::Table => Self::print_table_list(buses),
            ListFormat::Json => Self::print_json_list(buses)?,
        }
        Ok(())
    }

    fn print_simple_list(buses: &[&BusRecord]) {
        print_bus_count(buses.len());
        println!("{}", OutputStyle::separator());

        for bus in buses {
            println!("{}", OutputStyle::format_bus_line(bus));
        }
    }

    fn print_detailed_list(buses: &[&BusRecord]) {
        OutputStyle::print_header("🚌 Bus Board");

        for (i, bus) in buses.iter().enumerate() {
            println!("\n{}. {}", i + 1, OutputStyle::bus_name(&bus.name));
            OutputStyle::print_bus_basic(bus);
            println!(
                "  {}",
                OutputStyle::muted(&format!(
                    "Updated by {} ({}) at {}",
                    bus.updated_by,
                    bus.updated_by_role,
                    format_datetime(&bus.last_update_time)
                ))
            );

            if i + 1 < buses.len() {
                println!("{}", OutputStyle::separator());
            }
        }
    }

    fn print_table_list(buses: &[&BusRecord]) {
        print_bus_count(buses.len());

        let name_width = buses
            .iter()
            .map(|b| b.name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(10, 30);
        let number_width = buses
            .iter()
            .map(|b| b.number.chars().count())
            .max()
            .unwrap_or(0)
            .clamp(8, 16);
        let status_width = 24;

        println!(
            "┌─{}─┬─{}─┬─{}─┐",
            "─".repeat(name_width),
            "─".repeat(number_width),
            "─".repeat(status_width)
        );
        println!(
            "│ {} │ {} │ {} │",
            OutputStyle::header(&format!("{:<name_width$}", "Name")),
            OutputStyle::header(&format!("{:<number_width$}", "Number")),
            OutputStyle::header(&format!("{:<status_width$}", "Status")),
        );
        println!(
            "├─{}─┼─{}─┼─{}─┤",
            "─".repeat(name_width),
            "─".repeat(number_width),
            "─".repeat(status_width)
        );

        for bus in buses {
            let name = format!("{:<name_width$}", truncate_string(&bus.name, name_width));
            let number = format!("{:<number_width$}", truncate_string(&bus.number, number_width));
            let status = format!(
                "{:<status_width$}",
                truncate_string(&OutputStyle::status_text(bus), status_width)
            );
            println!(
                "│ {} │ {} │ {} │",
                OutputStyle::bus_name(&name),
                OutputStyle::number(&number),
                OutputStyle::status(bus.status(), &status)
            );
        }

        println!(
            "└─{}─┴─{}─┴─{}─┘",
            "─".repeat(name_width),
            "─".repeat(number_width),
            "─".repeat(status_width)
        );
    }

    fn print_json_list(buses: &[&BusRecord]) -> AppResult<()> {
        let json = serde_json::to_string_pretty(buses)?;
        println!("{}", json);
        Ok(())
    }
}
