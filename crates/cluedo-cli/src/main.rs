//! Local hot-seat Cluedo table.
//!
//! A line-oriented driver for the engine: it prints the current player,
//! their position and the legal actions, then feeds each typed command
//! through the translator. `board` redraws the grid, `quit` leaves.

use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use cluedo_core::{ClueGame, GamePhase, Outcome, Suspect};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Dice count from env or the standard single die
    let dice: u32 = std::env::var("CLUEDO_DICE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1);

    let mut game = ClueGame::new(dice);
    let roster: HashMap<Suspect, String> = Suspect::ALL
        .iter()
        .map(|s| (*s, s.name().to_string()))
        .collect();
    game.start(roster)?;
    info!("table opened, {} dice per roll", dice);

    println!("Commands: roll | move <dir> <n> ... | secret | suggest <s> <w>");
    println!("         | accuse <s> <w> <r> | endturn | board | quit");

    let stdin = io::stdin();
    let mut rng = rand::thread_rng();
    loop {
        if let GamePhase::Finished { winner } = game.phase() {
            match winner {
                Some(suspect) => println!("Game over: {} had it right!", suspect),
                None => println!("Game over: nobody solved it."),
            }
            println!("It was {}.", game.answer());
            break;
        }

        let player = match game.current_player() {
            Some(p) => p,
            None => break,
        };
        let options: Vec<String> = game
            .valid_actions()
            .iter()
            .map(|a| a.to_string())
            .collect();
        let position = game
            .position()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "off the board".to_string());
        print!(
            "{} ({}) [{}]> ",
            player.suspect,
            position,
            options.join(", ")
        );
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "quit" => break,
            "board" => {
                if let Some(board) = game.board() {
                    println!("{}", board.render(&mut rng));
                }
            }
            "hand" => {
                let hand: Vec<String> = player.cards.iter().map(|c| c.to_string()).collect();
                println!("Your cards: {}", hand.join(", "));
            }
            command => {
                let action = match game.translate(command) {
                    Ok(action) => action,
                    Err(err) => {
                        println!("? {}", err);
                        continue;
                    }
                };
                match game.perform(action) {
                    Ok(outcome) => announce(&outcome),
                    Err(err) => println!("! {}", err),
                }
            }
        }
    }

    Ok(())
}

fn announce(outcome: &Outcome) {
    match outcome {
        Outcome::Rolled(total) => println!("You rolled {}.", total),
        Outcome::Moved(Some(room)) => println!("You enter the {}.", room),
        Outcome::Moved(None) => println!("You stop in the hallway."),
        Outcome::Passage(room) => println!("The secret passage leads to the {}.", room),
        Outcome::Suggested(suggestion) => {
            println!("{}", suggestion.hint);
            match &suggestion.disproof {
                Some(disproof) => {
                    let cards: Vec<String> =
                        disproof.cards.iter().map(|c| c.to_string()).collect();
                    println!(
                        "{} can disprove with: {}",
                        disproof.player.suspect,
                        cards.join(", ")
                    );
                }
                None => println!("No one can disprove that."),
            }
        }
        Outcome::Accused(true) => println!("The accusation is correct!"),
        Outcome::Accused(false) => println!("Wrong! You are out of the game."),
        Outcome::TurnEnded => println!("Turn passed."),
    }
}
