use std::{
    io::{self, BufRead},
    sync::Arc,
};

use anyhow::Result;
use calc_core::{Calculator, RemoteEvaluator};
use clap::Parser;
use shared::domain::Operator;
use tracing::info;

mod config;

use config::{load_settings, normalize_server_url};

#[derive(Parser, Debug)]
struct Args {
    /// Evaluation service base URL; overrides keypad.toml and environment.
    #[arg(long)]
    server_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }
    let server_url = normalize_server_url(&settings.server_url);
    info!(%server_url, "keypad: using evaluation service");

    let calc = Calculator::new(Arc::new(RemoteEvaluator::new(server_url)));

    println!("keys: 0-9 . + - * / =   c = clear   x = backspace   q = quit");
    print_display(&calc).await;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        for key in line?.trim().chars() {
            match key {
                '0'..='9' => calc.digit(key).await,
                '.' => calc.decimal_point().await,
                '=' => calc.equals().await,
                'c' | 'C' => calc.clear().await,
                'x' | 'X' => calc.backspace().await,
                'q' | 'Q' => return Ok(()),
                ' ' => {}
                _ => match Operator::from_symbol(key) {
                    Some(op) => calc.operator(op).await,
                    None => println!("ignoring key '{key}'"),
                },
            }
        }
        print_display(&calc).await;
    }

    Ok(())
}

async fn print_display(calc: &Calculator) {
    println!("[{}]", calc.snapshot().await.display_text);
}
