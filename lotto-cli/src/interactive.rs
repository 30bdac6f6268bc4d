use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use lotto_client::config::ClientConfig;
use lotto_client::LottoProvider;
use lotto_core::models::{check_numbers, ticket_count, WinningDraw, MAX_NUMBER, MIN_NUMBER, NUMBERS_PER_TICKET};

use crate::screen::{Action, Navigator, Screen};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Purchase,
    History,
    Open,
    Check,
    Statistics,
    Home,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "purchase" | "buy" => Some(InteractiveCommand::Purchase),
        "2" | "history" | "hist" => Some(InteractiveCommand::History),
        "3" | "open" | "show" => Some(InteractiveCommand::Open),
        "4" | "check" | "winning" => Some(InteractiveCommand::Check),
        "5" | "statistics" | "stats" => Some(InteractiveCommand::Statistics),
        "6" | "home" => Some(InteractiveCommand::Home),
        "7" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(screen: Screen) {
    println!();
    match screen.purchase_id() {
        Some(id) => println!("── {} (purchase #{}) ──", screen.title(), id),
        None => println!("── {} ──", screen.title()),
    }
    if screen.shows_menu() {
        println!("  1. purchase   Buy tickets");
        println!("  2. history    Past purchases");
        println!("  3. open       Open a purchase");
        println!("  5. stats      Statistics");
        println!("  7. quit       Quit");
    } else {
        println!("  4. check      Check winning numbers");
        println!("  2. history    Past purchases");
        println!("  6. home       Back to home");
        println!("  7. quit       Quit");
    }
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Cannot read input")?;
    if read == 0 {
        bail!("end of input");
    }
    Ok(input.trim().to_string())
}

fn prompt_amount(config: &ClientConfig, last: Option<u64>) -> Result<u64> {
    if let Some(amount) = last {
        println!("Last purchase: {} won", amount);
    }
    loop {
        let msg = match last {
            Some(amount) => format!("Amount [{}] : ", amount),
            None => "Amount : ".to_string(),
        };
        let input = prompt(&msg)?;
        let amount = match (input.is_empty(), last) {
            (true, Some(amount)) => amount,
            _ => match input.parse::<u64>() {
                Ok(amount) => amount,
                Err(_) => {
                    println!("Enter a positive amount.");
                    continue;
                }
            },
        };
        match ticket_count(amount, config.ticket_price) {
            Ok(_) => return Ok(amount),
            Err(e) => println!("{}", e),
        }
    }
}

fn prompt_main_numbers() -> Result<[u8; NUMBERS_PER_TICKET]> {
    loop {
        let input = prompt(&format!(
            "{} winning numbers (space separated, {}-{}) : ",
            NUMBERS_PER_TICKET, MIN_NUMBER, MAX_NUMBER
        ))?;
        let nums: Result<Vec<u8>, _> = input.split_whitespace().map(|s| s.parse::<u8>()).collect();
        match nums {
            Ok(v) => match check_numbers(&v) {
                Ok(()) => {
                    let mut arr = [0u8; NUMBERS_PER_TICKET];
                    arr.copy_from_slice(&v);
                    return Ok(arr);
                }
                Err(e) => println!("{}. Try again.", e),
            },
            Err(_) => println!("Numbers only. Try again."),
        }
    }
}

fn prompt_draw() -> Result<WinningDraw> {
    let main = prompt_main_numbers()?;
    loop {
        let input = prompt(&format!("Bonus number ({}-{}) : ", MIN_NUMBER, MAX_NUMBER))?;
        let bonus = match input.parse::<u8>() {
            Ok(b) => b,
            Err(_) => {
                println!("Numbers only. Try again.");
                continue;
            }
        };
        match WinningDraw::new(main, bonus) {
            Ok(draw) => return Ok(draw),
            Err(e) => println!("{}. Try again.", e),
        }
    }
}

fn prompt_purchase_id() -> Result<u64> {
    let input = prompt("Purchase id : ")?;
    input.parse().context("Invalid purchase id")
}

fn command_action(command: &InteractiveCommand) -> Result<Option<Action>> {
    let action = match command {
        InteractiveCommand::Purchase => Action::GoPurchase,
        InteractiveCommand::History => Action::GoHistory,
        InteractiveCommand::Open => Action::SelectPurchase {
            purchase_id: prompt_purchase_id()?,
        },
        InteractiveCommand::Check => Action::CheckWinning,
        InteractiveCommand::Statistics => Action::GoStatistics,
        InteractiveCommand::Home => Action::GoHome,
        InteractiveCommand::Quit => return Ok(None),
    };
    Ok(Some(action))
}

fn render(provider: &dyn LottoProvider, config: &ClientConfig, nav: &mut Navigator) -> Result<()> {
    match nav.screen() {
        Screen::Home => {
            println!("Buy tickets, then check them against the winning numbers.");
            Ok(())
        }
        Screen::Purchase => {
            let amount = prompt_amount(config, nav.last_amount())?;
            let purchase_id = super::cmd_purchase(provider, config, amount)?;
            nav.apply(Action::Purchased { purchase_id, amount });
            super::cmd_show(provider, purchase_id)
        }
        Screen::PurchaseResult { purchase_id } => super::cmd_show(provider, purchase_id),
        Screen::History => super::cmd_history(provider),
        Screen::Winning { purchase_id } => {
            let draw = prompt_draw()?;
            super::cmd_check(provider, config, purchase_id, &draw)
        }
        Screen::Statistics => super::cmd_stats(provider),
    }
}

pub fn run_interactive(provider: &dyn LottoProvider, config: &ClientConfig) -> Result<()> {
    println!("Lotto 6/45 simulator, interactive mode.");
    let mut nav = Navigator::default();

    loop {
        display_menu(nav.screen());
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        let command = match parse_command(&input) {
            Some(command) => command,
            None => {
                println!("Unknown command: '{}'. Type a number (1-7) or a command name.", input);
                continue;
            }
        };

        let action = match command_action(&command) {
            Ok(Some(action)) => action,
            Ok(None) => {
                println!("Bye!");
                break;
            }
            Err(e) => {
                println!("Error: {e:#}");
                continue;
            }
        };

        if action == Action::CheckWinning && nav.screen().purchase_id().is_none() {
            println!("Open a purchase first.");
            continue;
        }

        nav.apply(action);
        if let Err(e) = render(provider, config, &mut nav) {
            println!("Error: {e:#}");
        }
    }

    Ok(())
}
