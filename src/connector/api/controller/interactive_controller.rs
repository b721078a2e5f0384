use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::application::ListValidationCoordinator;
use crate::domain::FieldPath;

use super::super::Container;
use super::ask_controller::format_outcome;
use super::validate_controller::format_report;

const HELP: &str = "\
Commands:
  city <i> <name>        set the city of entry i
  country <i> <name>     set the country of entry i
  location <i> <City,Country>
  add                    append a blank entry
  remove <i>             remove entry i
  date <YYYY-MM-DD>
  unit <celsius|fahrenheit>
  status                 show entries and errors
  submit                 ask the assistant (when the form is valid)
  clear                  reset the form
  help
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FormCommand {
    City(usize, String),
    Country(usize, String),
    Location(usize, String),
    Add,
    Remove(usize),
    Date(String),
    Unit(String),
    Status,
    Submit,
    Clear,
    Help,
    Quit,
}

impl FormCommand {
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        let indexed = |rest: &str| -> Result<(usize, String), String> {
            let (index, value) = rest.split_once(' ').unwrap_or((rest, ""));
            let index = index
                .parse::<usize>()
                .map_err(|_| format!("expected an entry index, got {index:?}"))?;
            Ok((index, value.trim().to_string()))
        };

        match verb {
            "city" => indexed(rest).map(|(i, v)| FormCommand::City(i, v)),
            "country" => indexed(rest).map(|(i, v)| FormCommand::Country(i, v)),
            "location" => indexed(rest).map(|(i, v)| FormCommand::Location(i, v)),
            "add" => Ok(FormCommand::Add),
            "remove" => indexed(rest).map(|(i, _)| FormCommand::Remove(i)),
            "date" => Ok(FormCommand::Date(rest.to_string())),
            "unit" => Ok(FormCommand::Unit(rest.to_string())),
            "status" => Ok(FormCommand::Status),
            "submit" => Ok(FormCommand::Submit),
            "clear" => Ok(FormCommand::Clear),
            "help" | "?" => Ok(FormCommand::Help),
            "quit" | "exit" => Ok(FormCommand::Quit),
            other => Err(format!("unknown command {other:?}, try \"help\"")),
        }
    }
}

pub struct InteractiveController<'a> {
    container: &'a Container,
}

impl<'a> InteractiveController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn run(&self) -> Result<String> {
        let mut form = self.container.blank_form();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{HELP}\n");
        println!("{}", format_report(&form, &form.report()));

        loop {
            tokio::select! {
                changed = form.next_completion() => {
                    if changed {
                        println!("{}", status_line(&form));
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match FormCommand::parse(&line) {
                        Ok(FormCommand::Quit) => break,
                        Ok(command) => {
                            let output = self.apply(&mut form, command).await;
                            println!("{output}");
                        }
                        Err(e) => println!("{e}"),
                    }
                }
            }
        }

        Ok("Bye.".to_string())
    }

    async fn apply(&self, form: &mut ListValidationCoordinator, command: FormCommand) -> String {
        let edited = match command {
            FormCommand::City(i, value) => form
                .set_city(i, value)
                .map(|_| form.touch(FieldPath::LocationCity(i))),
            FormCommand::Country(i, value) => form
                .set_country(i, value)
                .map(|_| form.touch(FieldPath::LocationCountry(i))),
            FormCommand::Location(i, value) => {
                let (city, country) = value.rsplit_once(',').unwrap_or((value.as_str(), ""));
                form.set_location(i, city.trim(), country.trim()).map(|_| {
                    form.touch(FieldPath::LocationCity(i));
                    form.touch(FieldPath::LocationCountry(i));
                })
            }
            FormCommand::Add => {
                form.add_entry();
                Ok(())
            }
            FormCommand::Remove(i) => form.remove_entry(i),
            FormCommand::Date(value) => {
                form.set_date(value);
                form.touch(FieldPath::Date);
                Ok(())
            }
            FormCommand::Unit(value) => {
                form.set_temperature_unit(value);
                form.touch(FieldPath::TemperatureUnit);
                Ok(())
            }
            FormCommand::Status => return format_report(form, &form.report()),
            FormCommand::Submit => {
                return match self.container.submit_use_case().execute(form).await {
                    Ok(outcome) => format_outcome(&outcome),
                    Err(e) => format!("Submit failed: {e}"),
                };
            }
            FormCommand::Clear => {
                form.clear();
                Ok(())
            }
            FormCommand::Help => return HELP.to_string(),
            FormCommand::Quit => return String::new(),
        };

        match edited {
            Ok(()) => status_line(form),
            Err(e) => e.to_string(),
        }
    }
}

fn status_line(form: &ListValidationCoordinator) -> String {
    let entries: Vec<String> = form
        .state()
        .locations
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let status = form
                .entry_status(i)
                .map(|s| s.to_string())
                .unwrap_or_default();
            format!("[{i}] {entry} {status}")
        })
        .collect();

    let mut line = if entries.is_empty() {
        "(no locations)".to_string()
    } else {
        entries.join(" | ")
    };
    for error in form.visible_errors() {
        line.push_str(&format!("\n  ! {error}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_indexed_commands() {
        assert_eq!(
            FormCommand::parse("city 0 New York").unwrap(),
            FormCommand::City(0, "New York".into())
        );
        assert_eq!(
            FormCommand::parse("location 1 Paris,France").unwrap(),
            FormCommand::Location(1, "Paris,France".into())
        );
        assert_eq!(FormCommand::parse("remove 2").unwrap(), FormCommand::Remove(2));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(FormCommand::parse("city x Paris").is_err());
        assert!(FormCommand::parse("fly away").is_err());
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(FormCommand::parse("  add ").unwrap(), FormCommand::Add);
        assert_eq!(FormCommand::parse("exit").unwrap(), FormCommand::Quit);
        assert_eq!(
            FormCommand::parse("unit fahrenheit").unwrap(),
            FormCommand::Unit("fahrenheit".into())
        );
    }
}
