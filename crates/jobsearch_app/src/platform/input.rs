use jobsearch_core::Msg;

use super::ui::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
    Invalid(String),
}

/// Maps one line of terminal input to a command.
///
/// Anything that is not a slash command is the new value of the keyword box.
pub fn parse_line(line: &str) -> Command {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return Command::Dispatch(Msg::KeywordInput(line.to_string()));
    }

    let (name, argument) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (trimmed, ""),
    };

    match name {
        CMD_SEARCH => Command::Dispatch(Msg::ExplicitSearch),
        CMD_CATEGORY => Command::Dispatch(Msg::CategorySelected(argument.to_string())),
        CMD_INDUSTRY => Command::Dispatch(Msg::IndustrySelected(argument.to_string())),
        CMD_LOCATION => Command::Dispatch(Msg::LocationSelected(argument.to_string())),
        CMD_PAGE => match argument.parse::<usize>() {
            Ok(page) => Command::Dispatch(Msg::PageSelected(page)),
            Err(_) => Command::Invalid(format!("not a page number: {argument:?}")),
        },
        CMD_HELP => Command::Help,
        CMD_QUIT => Command::Quit,
        other => Command::Invalid(format!("unknown command {other}")),
    }
}
