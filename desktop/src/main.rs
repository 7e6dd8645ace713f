use std::sync::Arc;

use clap::{Parser, Subcommand};

use siesta_desktop::types::NoteUpdate;
use siesta_desktop::{ApiClient, KeyringStore};

#[derive(Parser)]
#[command(name = "siesta", about = "Siesta notes from the terminal")]
struct Cli {
    /// Server base URL
    #[arg(long, env = "SIESTA_API", default_value = "http://127.0.0.1:8000")]
    api: String,
    /// Account email; tokens are stored in the system keychain under it
    #[arg(long, env = "SIESTA_EMAIL")]
    email: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account
    Signup {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: String,
    },
    /// Log in and store the token pair in the system keychain
    Login {
        #[arg(long)]
        password: String,
    },
    /// Show the authenticated account
    Me,
    /// Forget the locally stored session
    Logout,
    /// Manage notes
    #[command(subcommand)]
    Notes(NotesCommand),
    /// Manage preferences
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Subcommand)]
enum NotesCommand {
    List,
    Add {
        title: String,
        #[arg(default_value = "")]
        body: String,
    },
    Done {
        id: i64,
    },
    Rm {
        id: i64,
    },
}

#[derive(Subcommand)]
enum PrefsCommand {
    Show,
    Set { sleep_minutes: i32 },
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "siesta_desktop=info".to_string());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let client = ApiClient::new(&cli.api, &cli.email, Arc::new(KeyringStore::new()))?;

    match cli.command {
        Command::Signup { name, password } => {
            let account = client.signup(name.as_deref(), &password).await?;
            print_json(&account)?;
        }
        Command::Login { password } => {
            client.login(&password).await?;
            println!("logged in as {}", client.email());
        }
        Command::Me => {
            let me = client.me().await?;
            print_json(&me)?;
        }
        Command::Logout => {
            client.logout()?;
            println!("session cleared for {}", client.email());
        }
        Command::Notes(cmd) => match cmd {
            NotesCommand::List => {
                let notes = client.list_notes().await?;
                print_json(&notes)?;
            }
            NotesCommand::Add { title, body } => {
                let note = client.create_note(&title, &body, false).await?;
                print_json(&note)?;
            }
            NotesCommand::Done { id } => {
                let update = NoteUpdate {
                    done: Some(true),
                    ..Default::default()
                };
                let note = client.update_note(id, &update).await?;
                print_json(&note)?;
            }
            NotesCommand::Rm { id } => {
                client.delete_note(id).await?;
                println!("note {id} deleted");
            }
        },
        Command::Prefs(cmd) => match cmd {
            PrefsCommand::Show => {
                let prefs = client.get_prefs().await?;
                print_json(&prefs)?;
            }
            PrefsCommand::Set { sleep_minutes } => {
                let prefs = client.set_prefs(sleep_minutes).await?;
                print_json(&prefs)?;
            }
        },
    }

    Ok(())
}
