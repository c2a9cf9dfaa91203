//! Prompt lines typed at the interactive box office, mapped to UI actions.

use client_core::UiAction;
use shared::domain::FilmId;

pub const HELP: &str = "\
commands:
  list            show the detail panel and film menu
  select <id>     show a film's details
  buy             buy one ticket for the displayed film
  delete <id>     delete a film from the catalog
  reload          reload the catalog
  help            show this message
  quit            leave the box office";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Action(UiAction),
    List,
    Help,
    Quit,
    Empty,
}

pub fn parse_film_id(raw: &str) -> Result<FilmId, String> {
    FilmId::parse_input(raw).ok_or_else(|| "a film id is required".to_string())
}

pub fn parse_line(line: &str) -> Result<PromptCommand, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(PromptCommand::Empty);
    };
    let argument = words.collect::<Vec<_>>().join(" ");

    let parsed = match command.to_ascii_lowercase().as_str() {
        "list" | "ls" => PromptCommand::List,
        "select" | "show" => {
            PromptCommand::Action(UiAction::SelectFilm(parse_film_id(&argument)?))
        }
        "buy" => PromptCommand::Action(UiAction::BuyTicket),
        "delete" | "rm" => {
            PromptCommand::Action(UiAction::DeleteFilm(parse_film_id(&argument)?))
        }
        "reload" => PromptCommand::Action(UiAction::Reload),
        "help" | "?" => PromptCommand::Help,
        "quit" | "exit" | "q" => PromptCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(parsed)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
