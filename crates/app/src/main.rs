use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use services::{AppServices, Clock, GestureStep, StepResult, StudySession, StudyLoopService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;
use vocab_core::gesture::Gesture;
use vocab_core::model::UserKey;
use vocab_core::study::Advance;
use vocab_core::wordlist::WordLibrary;

#[derive(Parser)]
#[command(name = "words", about = "Vocabulary flashcards in the terminal", version)]
struct Cli {
    /// SQLite database url or file path
    #[arg(
        long = "db",
        env = "WORDS_DB_URL",
        default_value = "sqlite://words.sqlite3",
        global = true
    )]
    db_url: String,

    /// Learner key (ASCII letters only)
    #[arg(long, env = "WORDS_USER", global = true)]
    user: Option<String>,

    /// Grouped word list: a day number line followed by "word meaning" lines
    #[arg(long, env = "WORDS_LIST", global = true)]
    words: Option<PathBuf>,

    /// Supplementary word list: "word | meaning" lines
    #[arg(long, env = "WORDS_SUPPLEMENTARY", global = true)]
    supplementary: Option<PathBuf>,

    /// Shuffle seed, for replaying a session order
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Study words: d reveal, h swipe left, l swipe right, s toggle star, q quit
    Study(StudyArgs),
    /// Show counts, progress and the unknown/starred lists
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Register the learner or refresh their last login
    Login,
    /// Remove learners inactive for more than two weeks
    Cleanup,
}

#[derive(Args)]
struct StudyArgs {
    /// Days to study; none means every day
    days: Vec<u32>,
    #[arg(long, conflicts_with_all = ["unknown", "starred"])]
    supplementary: bool,
    /// Study the stored unknown words
    #[arg(long, conflicts_with = "starred")]
    unknown: bool,
    /// Study the starred words
    #[arg(long)]
    starred: bool,
}

#[derive(Debug)]
enum CliError {
    MissingUser,
    InvalidDbUrl { raw: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingUser => write!(f, "no learner given: pass --user or set WORDS_USER"),
            CliError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for CliError {}

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| CliError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(CliError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn read_list(path: Option<&Path>) -> Result<String, std::io::Error> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(String::new()),
    }
}

fn load_library(cli: &Cli) -> Result<WordLibrary, std::io::Error> {
    let grouped = read_list(cli.words.as_deref())?;
    let supplementary = read_list(cli.supplementary.as_deref())?;
    let library = WordLibrary::parse(&grouped, &supplementary);
    tracing::debug!(
        days = library.groups.len(),
        supplementary = library.supplementary.len(),
        "loaded word lists"
    );
    Ok(library)
}

fn user_key(cli: &Cli) -> Result<UserKey, Box<dyn std::error::Error>> {
    let raw = cli.user.as_deref().ok_or(CliError::MissingUser)?;
    Ok(UserKey::new(raw.trim())?)
}

//
// ─── STUDY LOOP ────────────────────────────────────────────────────────────────
//

fn show_current(session: &StudySession) {
    let Some(word) = session.current() else {
        return;
    };
    let progress = session.progress();
    let tag = if progress.reviewing { " review" } else { "" };
    println!(
        "[{}/{}{tag}] {}",
        progress.position + 1,
        progress.total,
        word.word
    );
    if session.is_revealed() {
        println!("    {}", word.meaning);
    }
}

fn report_step(step: &StepResult) {
    if let Some(err) = &step.write_error {
        println!("! not saved: {err}");
    }
    if let Advance::ReviewStarted { words } = step.resolution.advance {
        println!("-- reviewing {words} unknown word(s) --");
    }
}

async fn study(
    services: &AppServices,
    user: UserKey,
    args: &StudyArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let study = services.study_loop();
    let mut session = if args.supplementary {
        study.start_supplementary(user).await?
    } else if args.unknown {
        study.start_unknown(user).await?
    } else if args.starred {
        study.start_starred(user).await?
    } else {
        study.start_days(user, &args.days).await?
    };

    if session.is_empty() {
        println!("nothing to study");
        session.close();
        return Ok(());
    }

    show_current(&session);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let gesture = match line.trim() {
            "d" => Gesture::Reveal,
            "h" => Gesture::Left,
            "l" => Gesture::Right,
            "s" => {
                toggle_star(&study, &mut session).await;
                continue;
            }
            "q" => break,
            "" => continue,
            other => {
                println!("unknown command {other:?} (d, h, l, s, q)");
                continue;
            }
        };

        match study.apply_gesture(&mut session, gesture).await? {
            GestureStep::Revealed | GestureStep::Ignored => {}
            GestureStep::Resolved(step) => report_step(&step),
        }
        if session.is_complete() {
            break;
        }
        show_current(&session);
    }

    let summary = session.summary();
    if summary.complete {
        println!(
            "done: {} word(s), {} reviewed",
            summary.first_pass_words, summary.review_words
        );
    }
    session.close();
    Ok(())
}

async fn toggle_star(study: &StudyLoopService, session: &mut StudySession) {
    match study.toggle_star(session).await {
        Ok(true) => println!("* starred"),
        Ok(false) => println!("* unstarred"),
        Err(err) => println!("! star not saved: {err}"),
    }
}

//
// ─── OTHER COMMANDS ────────────────────────────────────────────────────────────
//

async fn stats(
    services: &AppServices,
    user: UserKey,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = services.statistics().report(user).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let s = report.statistics;
    println!("known:    {}", s.known);
    println!("learned:  {}", s.learned);
    println!("unknown:  {}", s.unknown);
    println!("starred:  {}", s.starred);
    println!(
        "progress: {}% of {} studied",
        report.progress_percentage, report.total_studied
    );
    for (title, words) in [
        ("unknown words", &report.unknown_words),
        ("starred words", &report.starred_words),
    ] {
        if words.is_empty() {
            continue;
        }
        println!("\n{title}:");
        for entry in words {
            println!("  {} - {}", entry.word, entry.meaning);
        }
    }
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let library = load_library(&cli)?;
    let mut services = AppServices::new_sqlite(&db_url, Clock::system(), library).await?;
    if let Some(seed) = cli.seed {
        services = services.with_seed(seed);
    }

    match &cli.command {
        Command::Study(args) => {
            let user = user_key(&cli)?;
            study(&services, user, args).await
        }
        Command::Stats { json } => {
            let user = user_key(&cli)?;
            stats(&services, user, *json).await
        }
        Command::Login => {
            let raw = cli.user.as_deref().ok_or(CliError::MissingUser)?;
            let login = services.users().login(raw).await?;
            if login.is_new {
                println!("registered {}", login.user.key);
            } else {
                println!("welcome back, {}", login.user.key);
            }
            Ok(())
        }
        Command::Cleanup => {
            let removed = services.users().cleanup_inactive().await?;
            println!("removed {} inactive user(s)", removed.len());
            for key in removed {
                println!("  {key}");
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_urls_are_normalized_to_absolute_paths() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/words.db"),
            "sqlite:///tmp/words.db"
        );
        assert_eq!(normalize_sqlite_url("/tmp/words.db"), "sqlite:///tmp/words.db");
        assert!(normalize_sqlite_url("words.db").starts_with("sqlite:///"));
    }

    #[test]
    fn study_flags_parse() {
        let cli = Cli::try_parse_from(["words", "--user", "alice", "study", "1", "3"]).unwrap();
        let Command::Study(args) = cli.command else {
            panic!("expected study");
        };
        assert_eq!(args.days, vec![1, 3]);
        assert!(!args.unknown);

        assert!(
            Cli::try_parse_from(["words", "study", "--unknown", "--starred"]).is_err()
        );
    }
}
