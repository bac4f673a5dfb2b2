//! Console command grammar.

use anyhow::{anyhow, bail, Result};
use client_core::Action;
use shared::protocol::{SearchMode, SearchQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Order,
    Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Act {
        target: Target,
        action: Action,
    },
    Set {
        target: Target,
        field: String,
        value: String,
    },
    Show(Option<Target>),
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
commands:
  order create|update|retrieve|delete|cancel|clear|list
  order search customer-id|status <value>
  order set <id|customer_id|tracking_id|status> <value>
  item  create|update|retrieve|delete|clear|list
  item  set <id|product_id|quantity|price|order_id> <value>
  show [order|item]
  help
  quit";

pub fn parse_line(line: &str) -> Result<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleCommand::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        "show" => match words.next() {
            None => Ok(ConsoleCommand::Show(None)),
            Some(word) => Ok(ConsoleCommand::Show(Some(parse_target(word)?))),
        },
        word => {
            let target = parse_target(word)?;
            let verb = words
                .next()
                .ok_or_else(|| anyhow!("missing action after '{word}'"))?
                .to_ascii_lowercase();
            let rest: Vec<&str> = words.collect();
            parse_verb(target, &verb, &rest)
        }
    }
}

fn parse_target(word: &str) -> Result<Target> {
    match word.to_ascii_lowercase().as_str() {
        "order" | "orders" => Ok(Target::Order),
        "item" | "items" | "orderitem" => Ok(Target::Item),
        other => bail!("unknown target '{other}' (expected order or item)"),
    }
}

fn parse_verb(target: Target, verb: &str, rest: &[&str]) -> Result<ConsoleCommand> {
    let action = match verb {
        "create" => Action::Create,
        "update" => Action::Update,
        "retrieve" | "get" => Action::Retrieve,
        "delete" => Action::Delete,
        "cancel" => Action::Cancel,
        "clear" => Action::Clear,
        "list" | "listall" => Action::ListAll,
        "search" => {
            let (mode, value) = rest
                .split_first()
                .ok_or_else(|| anyhow!("search needs a mode: customer-id or status"))?;
            let mode: SearchMode = mode.parse().map_err(|err: String| anyhow!(err))?;
            Action::Search(SearchQuery::new(mode, value.join(" ")))
        }
        "set" => {
            let (field, value) = rest
                .split_first()
                .ok_or_else(|| anyhow!("set needs a field name"))?;
            return Ok(ConsoleCommand::Set {
                target,
                field: field.to_string(),
                value: value.join(" "),
            });
        }
        other => bail!("unknown action '{other}'"),
    };
    Ok(ConsoleCommand::Act { target, action })
}

#[cfg(test)]
#[path = "tests/command_tests.rs"]
mod tests;
