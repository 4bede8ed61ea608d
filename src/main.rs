use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use danci_spell::config::{Config, SpeechBackend};
use danci_spell::logging::init_tracing;
use danci_spell::{
    Category, EngineError, FestivalSpeaker, GameWordSelector, LevelStore, NewSession,
    SelectionError, SessionEvent, SilentSpeaker, Speaker, SpeechConfig, SpellingEngine, Voice,
    SESSION_WORD_COUNT,
};

#[derive(Parser, Debug)]
#[command(name = "danci-spell", version, about = "Adaptive spelling quiz")]
struct Cli {
    /// Root folder of the word files (overrides DANCI_SPELL_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a 10-word quiz. Type `?` to hear the word again, `:q` to stop.
    Quiz {
        category: Category,
        #[arg(long)]
        voice: Option<Voice>,
    },
    /// Show per-word statistics
    Stats {
        category: Category,
        #[arg(long)]
        json: bool,
    },
    /// Move every word back to level 1 and clear its statistics
    Reset { category: Category },
    /// Add words at level 1
    Add {
        category: Category,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Remove words and their statistics
    Remove {
        category: Category,
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Replace every category from a sectioned word-list file
    Import { file: PathBuf },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir.clone());

    let store = LevelStore::open(&data_dir)
        .with_context(|| format!("failed to open word store at {}", data_dir.display()))?;
    let speaker: Arc<dyn Speaker> = match (&cli.command, config.speech) {
        (Command::Quiz { .. }, SpeechBackend::Festival) => Arc::new(FestivalSpeaker::new(SpeechConfig {
            voice: config.voice,
            ..SpeechConfig::default()
        })),
        _ => Arc::new(SilentSpeaker),
    };
    let selector = match config.seed {
        Some(seed) => GameWordSelector::with_seed(seed),
        None => GameWordSelector::new(),
    };
    let engine = SpellingEngine::with_selector(Arc::new(store), speaker, selector);

    match cli.command {
        Command::Quiz { category, voice } => {
            if let Some(voice) = voice {
                engine.set_voice(voice);
            }
            run_quiz(&engine, category)
        }
        Command::Stats { category, json } => print_stats(&engine, category, json),
        Command::Reset { category } => {
            engine.reset_category(category)?;
            println!("{category}: all words moved to level 1, statistics cleared");
            Ok(())
        }
        Command::Add { category, words } => {
            let report = engine.add_words(category, words)?;
            println!(
                "{category}: {} added, {} already present",
                report.added.len(),
                report.skipped.len()
            );
            Ok(())
        }
        Command::Remove { category, words } => {
            let report = engine.remove_words(category, words)?;
            println!("{category}: {} removed", report.removed.len());
            Ok(())
        }
        Command::Import { file } => {
            let lists = engine
                .import_word_list_file(&file)
                .with_context(|| format!("failed to import {}", file.display()))?;
            for (category, words) in Category::ALL.iter().zip(lists.iter()) {
                println!("{category}: {} words", words.len());
            }
            Ok(())
        }
    }
}

fn run_quiz(engine: &SpellingEngine, category: Category) -> Result<()> {
    let NewSession {
        mut session,
        events,
    } = match engine.new_session(category) {
        Ok(started) => started,
        Err(EngineError::Selection(SelectionError::NotEnoughWords { shortfall, .. })) => {
            println!("{category} needs {shortfall} more word(s) before a quiz can start.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    render(&events);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !session.is_completed() {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        match line.trim() {
            "?" => engine.relisten(&session),
            ":q" => break,
            answer => render(&engine.submit_answer(&mut session, answer)),
        }
    }

    if !session.is_completed() {
        let summary = engine.abandon(&mut session);
        println!(
            "Stopped after {} of {SESSION_WORD_COUNT} words, {} mastered.",
            summary.attempted, summary.mastered
        );
    }
    Ok(())
}

fn render(events: &[SessionEvent]) {
    for event in events {
        match event {
            SessionEvent::LowUnfamiliarWords { available } => println!(
                "Only {available} unfamiliar word(s) left. Consider adding new words."
            ),
            SessionEvent::NextWord { position, .. } => {
                println!("Spell word {position} of {SESSION_WORD_COUNT}")
            }
            SessionEvent::InvalidInput => println!("Letters and apostrophes only, please."),
            SessionEvent::SpeltCorrectly { .. } => println!("Correct!"),
            SessionEvent::SpeltWrongly { .. } => println!("Incorrect, try once more."),
            SessionEvent::Faulted { .. } => println!("Correct on the second try."),
            SessionEvent::FailedWord { correct_spelling } => {
                println!("Incorrect. The word was \"{correct_spelling}\".")
            }
            SessionEvent::EndOfQuiz(summary) => println!(
                "{} {} of {} words mastered ({:.0}%).",
                summary.band().message(),
                summary.mastered,
                summary.attempted,
                summary.accuracy() * 100.0
            ),
        }
    }
}

fn print_stats(engine: &SpellingEngine, category: Category, json: bool) -> Result<()> {
    let rows = engine.get_stats(category);
    let accuracy = engine.get_category_accuracy(category);

    if json {
        let body = serde_json::json!({
            "category": category,
            "accuracy": accuracy,
            "words": rows,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{category}: {accuracy}% overall accuracy");
    println!(
        "{:<20} {:>5} {:>8} {:>7} {:>6} {:>8}",
        "word", "level", "mastered", "faulted", "failed", "accuracy"
    );
    for row in rows {
        println!(
            "{:<20} {:>5} {:>8} {:>7} {:>6} {:>7}%",
            row.word.as_str(),
            row.level.value(),
            row.mastered,
            row.faulted,
            row.failed,
            row.accuracy
        );
    }
    Ok(())
}
