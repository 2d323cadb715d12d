//! userdesk binary entry point.
//!
//! Parses the command line, then either runs the TUI (raw-mode terminal,
//! restored on exit) or a one-shot `register` / `users` command.
//!
use std::process::ExitCode;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::runtime::Runtime;

use userdesk::api::{ClientProvider, User};
use userdesk::app::keymap::Keymap;
use userdesk::app::register::RegisterForm;
use userdesk::app::{self, AppState, Theme};
use userdesk::config::{self, Cli, Command, RegisterArgs};
use userdesk::error::{Context, Result, simple_error};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().with_ctx(|| "enable raw mode".to_string())?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn run_tui(cli: &Cli, runtime: &Runtime) -> Result<()> {
    config::init_file_logging(&cli.log_file)?;
    let provider = ClientProvider::shared(cli.api_config())?;
    let mut app = AppState::new(
        provider.base_url(),
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
    );

    let mut terminal = init_terminal()?;
    let res = app::run(&mut terminal, &mut app, provider, runtime.handle());

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    res.map_err(Into::into)
}

fn run_register(cli: &Cli, args: &RegisterArgs, runtime: &Runtime) -> Result<()> {
    config::init_stderr_logging()?;
    let form = RegisterForm {
        name: args.name.clone(),
        email: args.email.clone(),
        password: args.password.clone(),
        ..Default::default()
    };
    let data = form.validate().map_err(simple_error)?;
    let provider = ClientProvider::per_request(cli.api_config());
    let user = runtime.block_on(provider.register(&data))?;
    println!("Registered {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

fn run_users(cli: &Cli, json: bool, runtime: &Runtime) -> Result<()> {
    config::init_stderr_logging()?;
    let provider = ClientProvider::per_request(cli.api_config());
    let users = runtime.block_on(provider.get_users())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else {
        print_users_table(&users);
    }
    Ok(())
}

fn print_users_table(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }
    let name_w = users.iter().map(|u| u.name.chars().count()).max().unwrap_or(0).max(4);
    let email_w = users.iter().map(|u| u.email.chars().count()).max().unwrap_or(0).max(5);
    println!("{:<name_w$}  {:<email_w$}  JOINED", "NAME", "EMAIL");
    for u in users {
        println!(
            "{:<name_w$}  {:<email_w$}  {}",
            u.name,
            u.email,
            userdesk::ui::users::format_date(&u.created_at)
        );
    }
    println!("\nTotal Users: {}", users.len());
}

/// Program entry point: dispatch the subcommand and report any top-level error to stderr.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let runtime = match Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("application error: start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let res = match &cli.command {
        None | Some(Command::Tui) => run_tui(&cli, &runtime),
        Some(Command::Register(args)) => run_register(&cli, args, &runtime),
        Some(Command::Users { json }) => run_users(&cli, *json, &runtime),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("application error: {err}");
            ExitCode::FAILURE
        }
    }
}
