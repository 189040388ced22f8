//! Interactive REPL over the persona engine.
//!
//! Generates personas into the stream, saves them to the archive, deepens
//! biographies, and edits records, all against a local `~/.dossier` store.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use dossier_application::{ActiveView, ExpandOutcome, PersonaEngine, SaveOutcome};
use dossier_core::{regions, Gender, PersonaRecord, ProfileStorage};
use dossier_interaction::GeminiAgent;

#[derive(Parser)]
#[command(name = "dossier")]
#[command(about = "AI persona synthesis and archive engine", long_about = None)]
struct Cli {
    /// Gemini model to use for synthesis and expansion
    #[arg(long)]
    model: Option<String>,

    /// Storage directory (defaults to ~/.dossier)
    #[arg(long)]
    dir: Option<PathBuf>,
}

const HELP: &str = "\
  gen                         synthesize a persona into the stream
  list                        list the active view through the current filter
  show <n>                    full record, long biography when expanded
  deepen <n>                  deepen the biography / toggle the long form
  save <n>                    copy a record into the archive (needs sign-in)
  rm <n>                      remove a record from the archive
  edit <n> <field> <value>    edit one field (name, occupation, bio, age, ...)
  copy <n>                    print the record as canonical JSON
  login <name> / logout       identity session gating archive writes
  view stream|archive         switch the active view
  filter query <text>         substring filter over name/occupation/region
  filter region <region|All>  exact region filter
  filter gender <g|All>       exact gender filter
  filter clear                reset all filters
  regions                     list the region catalog for 'filter region'
  help / quit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dossier=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut agent = GeminiAgent::try_from_env()?;
    if let Some(model) = cli.model {
        agent = agent.with_model(model);
    }
    let storage = match cli.dir {
        Some(dir) => ProfileStorage::new(dir),
        None => ProfileStorage::default_location(),
    }?;

    let engine = PersonaEngine::new(Arc::new(agent), storage);

    println!("{}", "=== dossier ===".bright_magenta().bold());
    println!("{}", "Type 'help' for commands, 'quit' to exit.".bright_black());

    let mut rl = DefaultEditor::new()?;
    // Ids of the records shown by the last `list`, addressed as 1-based indexes.
    let mut listing: Vec<String> = Vec::new();

    loop {
        let prompt = banner(&engine).await;
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                let _ = rl.add_history_entry(&line);
                if let Err(e) = dispatch(&engine, trimmed, &mut listing).await {
                    eprintln!("{}", format!("{e}").red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

async fn banner(engine: &PersonaEngine) -> String {
    let view = match engine.view().await {
        ActiveView::Stream => "stream",
        ActiveView::Archive => "archive",
    };
    let who = engine
        .identity()
        .await
        .map(|i| i.username)
        .unwrap_or_else(|| "anon".to_string());
    prompt_line(&who, view, engine.archive_len().await)
}

/// The archive count stays visible from the stream too, not only while
/// browsing the archive.
fn prompt_line(who: &str, view: &str, archived: usize) -> String {
    if archived > 0 {
        format!("{who}@{view} [{archived} saved] >> ")
    } else {
        format!("{who}@{view} >> ")
    }
}

async fn dispatch(engine: &PersonaEngine, input: &str, listing: &mut Vec<String>) -> Result<()> {
    let mut parts = input.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let rest = parts.next().unwrap_or("").trim();

    match command {
        "help" => println!("{HELP}"),
        "gen" => {
            println!("{}", "Synthesizing...".bright_black());
            match engine.generate().await {
                Ok(record) => println!(
                    "{} {} - {} ({})",
                    "+".bright_green(),
                    record.full_name.bold(),
                    record.occupation,
                    record.region
                ),
                Err(e) => eprintln!("{}", format!("{e}").red()),
            }
        }
        "list" => {
            let records = engine.visible().await;
            *listing = records.iter().map(|r| r.id.clone()).collect();
            if records.is_empty() {
                println!("{}", "No results in the current parameters.".bright_black());
            }
            for (i, record) in records.iter().enumerate() {
                let marker = if record.is_detailed { "*" } else { " " };
                println!(
                    "{:>3}{} {} - {} ({}, {}, {})",
                    i + 1,
                    marker,
                    record.full_name.bold(),
                    record.occupation,
                    record.age,
                    record.gender,
                    record.region
                );
            }
        }
        "show" => {
            let id = resolve(listing, rest)?;
            let record = engine
                .get(&id)
                .await
                .ok_or_else(|| anyhow::anyhow!("record no longer present"))?;
            let expanded = engine.is_expanded(&id).await;
            print_record(&record, expanded);
        }
        "deepen" => {
            let id = resolve(listing, rest)?;
            match engine.expand(&id).await {
                Ok(ExpandOutcome::Deepened) => {
                    println!("{}", "Biography deepened.".bright_green())
                }
                Ok(ExpandOutcome::Toggled { expanded: true }) => {
                    println!("{}", "Showing full dossier.".bright_black())
                }
                Ok(ExpandOutcome::Toggled { expanded: false }) => {
                    println!("{}", "Showing short form.".bright_black())
                }
                Ok(ExpandOutcome::AlreadyInFlight) => {
                    println!("{}", "Already deepening this record.".yellow())
                }
                // Non-blocking: the record is unchanged and can be retried.
                Err(e) => eprintln!("{}", format!("{e}").yellow()),
            }
        }
        "save" => {
            let id = resolve(listing, rest)?;
            match engine.save_to_archive(&id).await? {
                SaveOutcome::Saved => println!("{}", "Saved to archive.".bright_green()),
                SaveOutcome::AlreadyArchived => {
                    println!("{}", "Already in the archive.".bright_black())
                }
                SaveOutcome::SignInRequired => {
                    println!("{}", "Sign in first: login <name>".yellow())
                }
            }
        }
        "rm" => {
            let id = resolve(listing, rest)?;
            if engine.remove_from_archive(&id).await? {
                println!("{}", "Removed from archive.".bright_green());
            } else {
                println!("{}", "Not in the archive.".bright_black());
            }
        }
        "edit" => {
            let mut args = rest.splitn(3, ' ');
            let index = args.next().unwrap_or_default();
            let field = args.next().unwrap_or_default();
            let value = args.next().unwrap_or_default().trim();
            if field.is_empty() || value.is_empty() {
                anyhow::bail!("usage: edit <n> <field> <value>");
            }
            let id = resolve(listing, index)?;
            engine.begin_edit(&id).await?;
            let mut applied = false;
            engine
                .update_draft(|draft| applied = set_field(draft, field, value))
                .await;
            if !applied {
                engine.cancel_edit().await;
                anyhow::bail!("unknown field '{field}'");
            }
            engine.commit_edit().await?;
            println!("{}", "Saved.".bright_green());
        }
        "copy" => {
            let id = resolve(listing, rest)?;
            println!("{}", engine.export_json(&id).await?);
            println!("{}", "Copied profile JSON above.".bright_black());
        }
        "login" => match engine.sign_in(rest).await {
            Ok(identity) => println!(
                "{}",
                format!("Signed in as {}.", identity.username).bright_green()
            ),
            Err(e) => eprintln!("{}", format!("{e}").red()),
        },
        "logout" => {
            engine.sign_out().await?;
            println!("{}", "Signed out; back to the stream.".bright_black());
        }
        "view" => match rest {
            "stream" => engine.set_view(ActiveView::Stream).await,
            "archive" => {
                if engine.identity().await.is_none() {
                    println!("{}", "Sign in to browse your archive.".yellow());
                } else {
                    engine.set_view(ActiveView::Archive).await;
                }
            }
            _ => anyhow::bail!("usage: view stream|archive"),
        },
        "filter" => {
            let mut args = rest.splitn(2, ' ');
            let kind = args.next().unwrap_or_default();
            let value = args.next().unwrap_or("").trim();
            match kind {
                "query" => engine.set_query(value).await,
                "region" => {
                    let region = (!value.eq_ignore_ascii_case("all") && !value.is_empty())
                        .then(|| value.to_string());
                    engine.set_region_filter(region).await;
                }
                "gender" => {
                    if value.eq_ignore_ascii_case("all") || value.is_empty() {
                        engine.set_gender_filter(None).await;
                    } else {
                        let gender = Gender::from_str(value)
                            .map_err(|_| anyhow::anyhow!("unknown gender '{value}'"))?;
                        engine.set_gender_filter(Some(gender)).await;
                    }
                }
                "clear" => {
                    engine.set_query("").await;
                    engine.set_region_filter(None).await;
                    engine.set_gender_filter(None).await;
                }
                _ => anyhow::bail!("usage: filter query|region|gender|clear"),
            }
        }
        "regions" => {
            for pair in regions::sorted_regions().chunks(2) {
                match pair {
                    [a, b] => println!("  {a:<42} {b}"),
                    [a] => println!("  {a}"),
                    _ => {}
                }
            }
        }
        _ => println!("{}", "Unknown command (try 'help')".bright_black()),
    }

    Ok(())
}

/// Resolves a 1-based index from the last `list` output to a record id.
fn resolve(listing: &[String], arg: &str) -> Result<String> {
    let index: usize = arg
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("expected a record number (run 'list' first)"))?;
    listing
        .get(index.wrapping_sub(1))
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("no record #{index} in the last listing"))
}

fn set_field(draft: &mut PersonaRecord, field: &str, value: &str) -> bool {
    match field {
        "name" => draft.full_name = value.to_string(),
        "occupation" => draft.occupation = value.to_string(),
        "bio" | "biography" => draft.biography = value.to_string(),
        "region" => draft.region = value.to_string(),
        "ethnicity" => draft.ethnicity = value.to_string(),
        "language" => draft.primary_language = value.to_string(),
        "dob" => draft.date_of_birth = value.to_string(),
        "age" => match value.parse() {
            Ok(age) => draft.age = age,
            Err(_) => return false,
        },
        "gender" => match Gender::from_str(value) {
            Ok(gender) => draft.gender = gender,
            Err(_) => return false,
        },
        _ => return false,
    }
    true
}

fn print_record(record: &PersonaRecord, expanded: bool) {
    println!("{}", record.full_name.bold());
    println!(
        "{}",
        format!(
            "{} | {}y | {} | {} | {} | speaks {}",
            record.occupation,
            record.age,
            record.gender,
            record.region,
            record.ethnicity,
            record.primary_language
        )
        .bright_black()
    );
    let biography = if expanded {
        &record.biography
    } else {
        &record.short_biography
    };
    for line in biography.lines() {
        println!("  {}", line.italic());
    }
    if record.is_detailed && !expanded {
        println!("{}", "  (deepen to show the full dossier)".bright_black());
    }
    if !record.interests.is_empty() {
        println!("{} {}", "Interests:".bright_cyan(), record.interests.join(", "));
    }
    if !record.personality_traits.is_empty() {
        println!(
            "{} {}",
            "Traits:".bright_blue(),
            record.personality_traits.join(", ")
        );
    }
}
