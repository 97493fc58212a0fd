use atty::Stream;
use color_eyre::Result;
use repipe_core::{
    format_status_message, to_json_response, CommandInfo, CommandStatus, ExecutionOutcome,
};
use serde_json::Value;

use crate::style::Style;

#[derive(Clone, Copy, Debug)]
pub struct OutputOptions {
    pub quiet: bool,
    pub json: bool,
    pub no_color: bool,
}

pub fn emit_output(
    opts: &OutputOptions,
    info: CommandInfo,
    outcome: &ExecutionOutcome,
) -> Result<i32> {
    let code = outcome.status.exit_code();

    if opts.json {
        let payload = to_json_response(info, outcome);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(code);
    }

    let message = format_status_message(info, &outcome.message);
    match outcome.status {
        CommandStatus::Ok => {
            if opts.quiet {
                return Ok(code);
            }
            let style = Style::new(opts.no_color, atty::is(Stream::Stdout));
            for change in change_lines_from_details(&outcome.details) {
                let line = format!("repipe {}: {}", info.name, change);
                println!("{}", style.info(&line));
            }
            println!("{}", style.status(outcome.status, &message));
        }
        CommandStatus::UserError | CommandStatus::Failure => {
            let style = Style::new(opts.no_color, atty::is(Stream::Stderr));
            eprintln!("{}", style.status(outcome.status, &message));
            if let Some(error) = detail_str(&outcome.details, "error") {
                eprintln!("  {error}");
            }
            if let Some(hint) = detail_str(&outcome.details, "hint") {
                eprintln!("{}", style.hint(hint));
            }
            if let Some(text) = detail_str(&outcome.details, "output") {
                if !text.is_empty() {
                    eprintln!();
                    eprintln!("{}", style.section("pip output:"));
                    eprintln!("{text}");
                }
            }
        }
    }

    Ok(code)
}

fn detail_str<'a>(details: &'a Value, key: &str) -> Option<&'a str> {
    details
        .as_object()
        .and_then(|map| map.get(key))
        .and_then(Value::as_str)
}

fn change_lines_from_details(details: &Value) -> Vec<String> {
    let Some(changes) = details.get("changes").and_then(Value::as_array) else {
        return Vec::new();
    };
    changes
        .iter()
        .filter_map(|change| {
            let name = change.get("name").and_then(Value::as_str)?;
            match change.get("kind").and_then(Value::as_str)? {
                "updated" => {
                    let from = change.get("from").and_then(Value::as_str)?;
                    let to = change.get("to").and_then(Value::as_str)?;
                    Some(format!("changed {name} from {from} to {to}"))
                }
                "added" => {
                    let version = change.get("version").and_then(Value::as_str)?;
                    Some(format!("added {name}=={version}"))
                }
                _ => None,
            }
        })
        .collect()
}
