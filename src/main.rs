//! Quiz Quest - Entry Point
//!
//! Text front-end for the encounter engine. Loads study material, fills the
//! question bank, then runs a REPL where the player picks fights, casts
//! spells and answers questions.

use quiz_quest::battle::constants::FRAME_MS;
use quiz_quest::battle::events::{BattleEventLog, BattleEventType};
use quiz_quest::battle::spell::Spell;
use quiz_quest::core::config::GameConfig;
use quiz_quest::core::error::Result;
use quiz_quest::core::types::EnemyId;
use quiz_quest::quiz::question::AgeLevel;
use quiz_quest::quiz::source::LlmQuestionSource;
use quiz_quest::session::GameSession;

use clap::Parser;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Quiz Quest - turn study material into spell battles
#[derive(Parser, Debug)]
#[command(name = "quiz-quest")]
#[command(about = "Answer questions about your study material to cast spells")]
struct Args {
    /// Text file with the study material questions are generated from
    #[arg(long)]
    material: Option<PathBuf>,

    /// Age bracket the questions are written for
    #[arg(long, value_enum, default_value_t = AgeLevel::EarlyElementary)]
    age: AgeLevel,

    /// Number of questions to pre-generate (overrides the config file)
    #[arg(long)]
    count: Option<usize>,

    /// Random seed for deterministic question order
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

type Session = GameSession<LlmQuestionSource>;

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they don't interleave with the prompt
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quiz_quest=info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(count) = args.count {
        config.bank.target_count = count;
    }
    config.validate()?;

    let material = match &args.material {
        Some(path) => fs::read_to_string(path)?,
        None => String::new(),
    };

    let rt = Runtime::new()?;

    let source = LlmQuestionSource::from_env();
    let generated = source.has_client();

    let mut session = match args.seed {
        Some(seed) => GameSession::with_seed(source, config, material, args.age, seed),
        None => GameSession::new(source, config, material, args.age),
    };

    println!("\n=== QUIZ QUEST ===");
    println!("Answer questions correctly to cast spells at your enemies.");
    if !generated {
        println!("(LLM_API_KEY not set - using built-in questions)");
    }
    println!();

    if args.material.is_some() {
        println!("Preparing questions...");
        rt.block_on(session.prepare_questions());
        let stats = session.bank().stats();
        println!("{} questions ready for ages {}.", stats.total, stats.age_level);
    }

    print_help();

    loop {
        display_status(&session);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        let (command, arg) = match input.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };

        match command {
            "quit" | "q" => break,
            "help" | "h" => print_help(),
            "enemies" | "e" => list_enemies(&session),
            "stats" | "s" => display_stats(&session),
            "inventory" | "inv" => display_inventory(&session),
            "fight" | "f" => match arg.parse::<u32>() {
                Ok(id) => match session.engage(EnemyId(id)) {
                    Ok(()) => {
                        if let Some(enemy) = session.active_enemy() {
                            println!("You face {}!", enemy.title);
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                Err(_) => println!("Usage: fight <enemy id>"),
            },
            "cast" | "c" => match arg.parse::<Spell>() {
                Ok(spell) => match rt.block_on(session.cast(spell)) {
                    Ok(log) if log.is_empty() => println!("You can't cast right now."),
                    Ok(log) => print_events(&log),
                    Err(e) => println!("{}", e),
                },
                Err(e) => println!("{}", e),
            },
            "item" | "i" => match arg.parse::<usize>() {
                Ok(slot) if slot > 0 => match session.use_item(slot - 1) {
                    Ok(hp) => println!("You feel better. HP: {}", hp.value()),
                    Err(e) => println!("{}", e),
                },
                _ => println!("Usage: item <slot number>"),
            },
            "run" | "r" => match session.run_away() {
                Ok(_) => println!(
                    "You escaped. HP restored to {}.",
                    session.player_hp().value()
                ),
                Err(e) => println!("{}", e),
            },
            _ => match input.parse::<usize>() {
                Ok(choice @ 1..=4) => answer(&mut session, choice - 1),
                _ => println!("Unknown command. Type 'help' for the list."),
            },
        }

        if session.enemies().is_empty() {
            println!("\nEvery enemy is defeated. You win!");
            break;
        }
    }

    let stats = session.bank().stats();
    println!(
        "\nGoodbye! {} enemies defeated, {}/{} answers correct.",
        session.defeated_count(),
        stats.correct,
        stats.attempts
    );
    Ok(())
}

/// Answer, then play frames until the encounter settles
fn answer(session: &mut Session, choice: usize) {
    match session.answer(choice) {
        Ok(log) if log.is_empty() => println!("There is no question to answer."),
        Ok(log) => print_events(&log),
        Err(e) => {
            println!("{}", e);
            return;
        }
    }

    while session.is_animating() {
        let log = session.tick(FRAME_MS);
        print_events(&log);
    }
}

fn print_events(log: &BattleEventLog) {
    for event in &log.events {
        match &event.event_type {
            BattleEventType::QuestionDealt { spell, question } => {
                println!("\n[{}] {}", spell, question.text());
                for (i, option) in question.options().iter().enumerate() {
                    println!("  {}. {}", i + 1, option);
                }
            }
            BattleEventType::Answered {
                question, correct, ..
            } => {
                if *correct {
                    println!("Correct!");
                } else {
                    println!(
                        "Wrong! The answer was: {}",
                        question.options()[question.correct_index()]
                    );
                }
            }
            // Per-frame movement is too noisy for a terminal
            BattleEventType::ProjectileMoved { .. }
            | BattleEventType::Hurt { .. }
            | BattleEventType::HurtCleared { .. } => {}
            _ => println!("  {}", event.description),
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  enemies / e        - List enemies on the map");
    println!("  fight <id> / f     - Start an encounter");
    println!("  cast <spell> / c   - Cast fireball, ice-shard, lightning or heal");
    println!("  1-4                - Answer the current question");
    println!("  item <slot> / i    - Use an inventory item");
    println!("  inventory / inv    - Show inventory");
    println!("  run / r            - Flee the encounter");
    println!("  stats / s          - Show question bank stats");
    println!("  quit / q           - Exit the game");
    println!();
}

fn display_status(session: &Session) {
    let hp = session.player_hp().value();
    match (session.active_enemy(), session.engagement()) {
        (Some(enemy), Some(engagement)) => println!(
            "\nHP {} | {} HP {}",
            hp,
            enemy.title,
            engagement.enemy_hp().value()
        ),
        _ => println!(
            "\nHP {} | {} enemies left | {} items",
            hp,
            session.enemies().len(),
            session.inventory().len()
        ),
    }
}

fn list_enemies(session: &Session) {
    for enemy in session.enemies() {
        println!("  {:>2}. {} ({})", enemy.id.0, enemy.title, enemy.color);
    }
}

fn display_inventory(session: &Session) {
    if session.inventory().is_empty() {
        println!("Your bag is empty.");
        return;
    }
    for (slot, item) in session.inventory().items().iter().enumerate() {
        println!("  {}. {:?}", slot + 1, item.kind);
    }
}

fn display_stats(session: &Session) {
    let stats = session.bank().stats();
    println!("Question bank (ages {}):", stats.age_level);
    println!(
        "  {} questions, {} used, {} remaining",
        stats.total, stats.used, stats.remaining
    );
    println!(
        "  {} attempts: {} correct, {} incorrect",
        stats.attempts, stats.correct, stats.incorrect
    );
    if stats.is_generating {
        println!("  (still generating)");
    }
}
