//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::Session;
use gleaner_domain::{FieldType, LlmProvider};
use gleaner_extractor::SourceFile;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::fmt::Display;
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl<L>(session: &mut Session<L>, formatter: &Formatter, history_size: usize) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
{
    println!("{}", formatter.info("Gleaner REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = format!("gleaner [{} files, {} fields]> ", session.files().len(), session.schema().len());

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                    }
                    Ok(cmd) => {
                        if let Err(e) = execute_repl_command(cmd, session, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Which part of a field `field set` changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldAttr {
    Name,
    Type,
    Description,
}

/// REPL command type.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    FieldAdd {
        name: Option<String>,
        field_type: FieldType,
        description: String,
    },
    FieldSet {
        position: usize,
        attr: FieldAttr,
        value: String,
    },
    FieldRemove(usize),
    Fields,
    Clear,
    Template(String),
    Templates,
    FileAdd(Vec<String>),
    FileRemove(usize),
    Files,
    Extract,
    Result,
    Accounts,
    Select(String),
    Send,
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "field" => parse_field_command(&parts[1..]),
        "fields" => Ok(ReplCommand::Fields),
        "clear" => Ok(ReplCommand::Clear),
        "template" => match parts.get(1) {
            Some(id) => Ok(ReplCommand::Template(id.to_string())),
            None => Err(CliError::InvalidInput("Usage: template <id>".to_string())),
        },
        "templates" => Ok(ReplCommand::Templates),
        "file" => parse_file_command(&parts[1..]),
        "files" => Ok(ReplCommand::Files),
        "extract" => Ok(ReplCommand::Extract),
        "result" => Ok(ReplCommand::Result),
        "accounts" => Ok(ReplCommand::Accounts),
        "select" => match parts.get(1) {
            Some(id) => Ok(ReplCommand::Select(id.to_string())),
            None => Err(CliError::InvalidInput("Usage: select <account-id>".to_string())),
        },
        "send" => Ok(ReplCommand::Send),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

fn parse_field_command(args: &[&str]) -> Result<ReplCommand> {
    match args.first().copied() {
        Some("add") => {
            let name = args.get(1).map(|s| s.to_string());
            let field_type = match args.get(2) {
                Some(t) => parse_field_type(t)?,
                None => FieldType::Text,
            };
            let description = args.get(3..).map(|rest| rest.join(" ")).unwrap_or_default();
            Ok(ReplCommand::FieldAdd {
                name,
                field_type,
                description,
            })
        }
        Some("set") => {
            if args.len() < 3 {
                return Err(CliError::InvalidInput(
                    "Usage: field set <n> <name|type|description> [value...]".to_string(),
                ));
            }
            let position = parse_position(args[1])?;
            let attr = match args[2] {
                "name" => FieldAttr::Name,
                "type" => FieldAttr::Type,
                "description" | "desc" => FieldAttr::Description,
                other => {
                    return Err(CliError::InvalidInput(format!("Unknown field attribute: {}", other)))
                }
            };
            let value = args[3..].join(" ");
            if attr == FieldAttr::Type {
                parse_field_type(&value)?;
            }
            Ok(ReplCommand::FieldSet {
                position,
                attr,
                value,
            })
        }
        Some("rm") | Some("remove") => match args.get(1) {
            Some(n) => Ok(ReplCommand::FieldRemove(parse_position(n)?)),
            None => Err(CliError::InvalidInput("Usage: field rm <n>".to_string())),
        },
        _ => Err(CliError::InvalidInput(
            "Usage: field <add|set|rm> ...".to_string(),
        )),
    }
}

fn parse_file_command(args: &[&str]) -> Result<ReplCommand> {
    match args.first().copied() {
        Some("add") if args.len() > 1 => Ok(ReplCommand::FileAdd(
            args[1..].iter().map(|s| s.to_string()).collect(),
        )),
        Some("add") => Err(CliError::InvalidInput("Usage: file add <path>...".to_string())),
        Some("rm") | Some("remove") => match args.get(1) {
            Some(n) => Ok(ReplCommand::FileRemove(parse_position(n)?)),
            None => Err(CliError::InvalidInput("Usage: file rm <n>".to_string())),
        },
        _ => Err(CliError::InvalidInput("Usage: file <add|rm> ...".to_string())),
    }
}

fn parse_field_type(s: &str) -> Result<FieldType> {
    FieldType::parse(s).ok_or_else(|| {
        CliError::InvalidInput(format!("Unknown field type '{}' (text, number, date)", s))
    })
}

fn parse_position(s: &str) -> Result<usize> {
    s.parse()
        .map_err(|_| CliError::InvalidInput(format!("Expected a position number, got '{}'", s)))
}

/// Execute a REPL command.
async fn execute_repl_command<L>(cmd: ReplCommand, session: &mut Session<L>, formatter: &Formatter) -> Result<()>
where
    L: LlmProvider,
    L::Error: Display,
{
    match cmd {
        ReplCommand::FieldAdd {
            name,
            field_type,
            description,
        } => {
            let schema = session.schema_mut();
            let id = schema.add_blank();
            if let Some(name) = name {
                schema.set_name(id, name)?;
            }
            schema.set_type(id, field_type)?;
            schema.set_description(id, description)?;
            println!("{}", formatter.success(&format!("Added field #{}", schema.len())));
        }
        ReplCommand::FieldSet {
            position,
            attr,
            value,
        } => {
            let id = session.field_id(position)?;
            let schema = session.schema_mut();
            match attr {
                FieldAttr::Name => schema.set_name(id, value)?,
                FieldAttr::Type => schema.set_type(id, parse_field_type(&value)?)?,
                FieldAttr::Description => schema.set_description(id, value)?,
            }
            println!("{}", formatter.format_schema(session.schema())?);
        }
        ReplCommand::FieldRemove(position) => {
            let id = session.field_id(position)?;
            session.schema_mut().remove(id);
            println!("{}", formatter.success(&format!("Removed field #{}", position)));
        }
        ReplCommand::Fields => {
            println!("{}", formatter.format_schema(session.schema())?);
        }
        ReplCommand::Clear => {
            session.schema_mut().clear();
            println!("{}", formatter.success("Cleared all fields"));
        }
        ReplCommand::Template(id) => {
            let added = session.apply_template(&id)?;
            println!("{}", formatter.success(&format!("Added {} field(s) from '{}'", added, id)));
        }
        ReplCommand::Templates => {
            println!("{}", formatter.format_templates(session.templates())?);
        }
        ReplCommand::FileAdd(paths) => {
            for path in paths {
                let file = SourceFile::from_path(path);
                let name = file.name.clone();
                match session.add_file(file) {
                    Ok(()) => println!("{}", formatter.success(&format!("Added {}", name))),
                    Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                }
            }
        }
        ReplCommand::FileRemove(position) => {
            let file = session.remove_file(position)?;
            println!("{}", formatter.success(&format!("Removed {}", file.name)));
        }
        ReplCommand::Files => {
            println!("{}", formatter.format_files(session.files())?);
        }
        ReplCommand::Extract => {
            println!("{}", formatter.info("Extracting..."));
            let result = session.extract().await?;
            println!("{}", formatter.format_result(result)?);
            if result.is_success() && session.has_crm() {
                session.load_accounts().await;
            }
        }
        ReplCommand::Result => match session.result() {
            Some(result) => {
                println!("{}", formatter.format_result(result)?);
                if session.has_crm() {
                    println!("CRM: {}", formatter.crm_status(session.crm_status()));
                }
            }
            None => println!("{}", formatter.warning("No result yet. Run 'extract' first.")),
        },
        ReplCommand::Accounts => {
            if !session.has_crm() {
                return Err(CliError::Config("CRM webhook URL is not configured".into()));
            }
            let selected = session.selected_account().map(str::to_string);
            let accounts = session.load_accounts().await;
            println!("{}", formatter.format_accounts(accounts, selected.as_deref())?);
        }
        ReplCommand::Select(id) => {
            session.load_accounts().await;
            let account = session.select_account(&id)?;
            println!("{}", formatter.success(&format!("Selected {} ({})", account.name, account.id)));
        }
        ReplCommand::Send => {
            if let Some(blocker) = session.send_blocker() {
                println!("{}", formatter.warning(&blocker.to_string()));
                return Ok(());
            }
            println!("{}", formatter.info("Sending..."));
            if let Some(status) = session.send().await {
                println!("{}", formatter.crm_status(status));
            }
        }
        ReplCommand::Exit | ReplCommand::Help => {}
    }

    Ok(())
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::new(
        std::io::ErrorKind::Other,
        format!("Failed to initialize editor: {}", e),
    ))
}

fn get_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    let gleaner_dir = home.join(".gleaner");
    std::fs::create_dir_all(&gleaner_dir)?;
    Ok(gleaner_dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  field add [name] [type] [description...] - Add a field (type: text|number|date)");
    println!("  field set <n> name|type|description <v>  - Update field #n");
    println!("  field rm <n>                              - Remove field #n");
    println!("  fields                                    - Show the schema");
    println!("  clear                                     - Remove all fields");
    println!("  template <id>                             - Append a template's fields");
    println!("  templates                                 - List templates");
    println!("  file add <path>...                        - Add files");
    println!("  file rm <n>                               - Remove file #n");
    println!("  files                                     - List files");
    println!("  extract                                   - Extract fields from all files");
    println!("  result                                    - Show the last result");
    println!("  accounts                                  - List CRM accounts");
    println!("  select <account-id>                       - Choose the CRM account");
    println!("  send                                      - Send the result to the CRM");
    println!("  help, ?                                   - Show this help");
    println!("  exit, quit, q                             - Exit REPL");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_commands() {
        assert_eq!(parse_repl_command("exit").unwrap(), ReplCommand::Exit);
        assert_eq!(parse_repl_command("?").unwrap(), ReplCommand::Help);
        assert_eq!(parse_repl_command("extract").unwrap(), ReplCommand::Extract);
        assert_eq!(parse_repl_command("send").unwrap(), ReplCommand::Send);
        assert!(parse_repl_command("frobnicate").is_err());
    }

    #[test]
    fn test_parse_field_add() {
        assert_eq!(
            parse_repl_command("field add total number Gross amount due").unwrap(),
            ReplCommand::FieldAdd {
                name: Some("total".to_string()),
                field_type: FieldType::Number,
                description: "Gross amount due".to_string(),
            }
        );
        assert_eq!(
            parse_repl_command("field add").unwrap(),
            ReplCommand::FieldAdd {
                name: None,
                field_type: FieldType::Text,
                description: String::new(),
            }
        );
        assert!(parse_repl_command("field add total money").is_err());
    }

    #[test]
    fn test_parse_field_set() {
        assert_eq!(
            parse_repl_command("field set 2 description Signing date").unwrap(),
            ReplCommand::FieldSet {
                position: 2,
                attr: FieldAttr::Description,
                value: "Signing date".to_string(),
            }
        );
        assert!(parse_repl_command("field set x name total").is_err());
        assert!(parse_repl_command("field set 1 type money").is_err());
        assert!(parse_repl_command("field set 1").is_err());
    }

    #[test]
    fn test_parse_file_commands() {
        assert_eq!(
            parse_repl_command("file add a.pdf b.mp3").unwrap(),
            ReplCommand::FileAdd(vec!["a.pdf".to_string(), "b.mp3".to_string()])
        );
        assert_eq!(parse_repl_command("file rm 1").unwrap(), ReplCommand::FileRemove(1));
        assert!(parse_repl_command("file add").is_err());
    }

    #[test]
    fn test_parse_select_and_template() {
        assert_eq!(
            parse_repl_command("select 42").unwrap(),
            ReplCommand::Select("42".to_string())
        );
        assert_eq!(
            parse_repl_command("template test-template").unwrap(),
            ReplCommand::Template("test-template".to_string())
        );
        assert!(parse_repl_command("select").is_err());
    }
}
