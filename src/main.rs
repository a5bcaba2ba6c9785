use clap::Parser;
use mault::cli::commands::create::ValueSource;
use mault::cli::terminal::TerminalPasswordReader;
use mault::cli::{commands, logger, output, signal, Cli, Commands, Session};
use mault::config::{resolve_home, Settings};
use mault::context::Context;
use mault::errors::{MaultError, Result};

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    if let Err(e) = run(&cli) {
        match e {
            MaultError::Cancelled => eprintln!("Aborted."),
            e => output::error(&e.to_string()),
        }
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Commands that never touch the vault.
    match cli.command {
        Commands::Generate { length } => return commands::generate::execute(length),
        Commands::Completions { ref shell } => return commands::completions::execute(shell),
        _ => {}
    }

    let home = resolve_home(cli.home.as_deref())?;
    let settings = Settings::load(&home)?;

    let ctx = match settings.command_timeout() {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::new(),
    };
    if !signal::forward_interrupts(&ctx) {
        log::warn!("could not install the interrupt handler");
    }

    let session = Session::open(&home, settings, ctx)?;
    let reader = TerminalPasswordReader::new();

    let result = match cli.command {
        Commands::Init => commands::init::execute(&session, &reader),
        Commands::Create {
            ref key,
            generate,
            length,
        } => commands::create::execute(
            &session,
            &reader,
            key,
            ValueSource::detect(generate, length),
        ),
        Commands::Get { ref key } => commands::get::execute(&session, &reader, key),
        Commands::Delete { ref key, force } => {
            commands::delete::execute(&session, &reader, key, force)
        }
        Commands::List => commands::list::execute(&session),
        Commands::History { last, ref since } => {
            commands::history::execute(&session, last, since.as_deref())
        }
        Commands::Generate { .. } | Commands::Completions { .. } => Ok(()),
    };

    let closed = session.close();
    result.and(closed)
}
