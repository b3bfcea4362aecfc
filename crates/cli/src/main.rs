use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use console::style;
use libris_config::{AppConfig, ConfigManager, LogLevel};
use libris_core::CatalogError;
use libris_library::LibraryManager;
use std::path::PathBuf;

mod commands;
mod menu;
mod render;

fn build_cli() -> Command {
    Command::new("libris")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Libris Contributors")
        .about("Library catalog manager: books, copies and who has them")
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory holding the record files (overrides the config)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("add")
                .about("Add copies of a book to the catalog")
                .arg(Arg::new("title").short('t').long("title").value_name("TITLE").required(true).help("Book title"))
                .arg(Arg::new("author").short('a').long("author").value_name("AUTHOR").required(true).help("Book author"))
                .arg(Arg::new("isbn").short('i').long("isbn").value_name("ISBN").required(true).help("Unique identifier"))
                .arg(
                    Arg::new("category")
                        .short('c')
                        .long("category")
                        .value_name("CATEGORY")
                        .required(true)
                        .help("0-4 or a name such as 'physics' or 'computer-science'"),
                )
                .arg(
                    Arg::new("quantity")
                        .short('q')
                        .long("quantity")
                        .value_name("N")
                        .value_parser(value_parser!(u32))
                        .help("Number of copies (default from config)"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List the books in the catalog")
                .arg(Arg::new("category").short('c').long("category").value_name("CATEGORY").help("Only show one category")),
        )
        .subcommand(
            Command::new("search")
                .about("Search titles, authors and identifiers")
                .arg(Arg::new("query").required(true).value_name("QUERY").help("Search term")),
        )
        .subcommand(
            Command::new("issue")
                .about("Issue a copy of a book to a user")
                .arg(Arg::new("isbn").required(true).value_name("ISBN"))
                .arg(Arg::new("user").required(true).value_name("USER")),
        )
        .subcommand(
            Command::new("return")
                .about("Return a borrowed copy")
                .arg(Arg::new("isbn").required(true).value_name("ISBN"))
                .arg(Arg::new("user").required(true).value_name("USER")),
        )
        .subcommand(
            Command::new("user-books")
                .about("Show the books a user has borrowed")
                .arg(Arg::new("user").required(true).value_name("USER")),
        )
        .subcommand(Command::new("stats").about("Show catalog statistics"))
        .subcommand(
            Command::new("export")
                .about("Export books and users as JSON")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file (stdout when omitted)"),
                ),
        )
        .subcommand(Command::new("menu").about("Run the interactive menu (default)"))
        .subcommand(
            Command::new("config")
                .about("Inspect or repair the config file")
                .subcommand_required(true)
                .subcommand(Command::new("path").about("Print where the config file lives"))
                .subcommand(
                    Command::new("show").about("Print the settings in use, overrides included"),
                )
                .subcommand(Command::new("check").about("List problems in the config file"))
                .subcommand(Command::new("init").about("Write a default config file if none exists"))
                .subcommand(
                    Command::new("reset")
                        .about("Replace the config file with defaults, keeping a backup"),
                ),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => ConfigManager::with_directory(dir.clone()),
        None => ConfigManager::new(),
    }
    .context("Failed to locate the config directory")
}

fn init_logging(level: LogLevel, verbose: bool) {
    let default_filter = if verbose {
        "debug".to_string()
    } else {
        level.to_string()
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(matches: &ArgMatches) -> Result<()> {
    let verbose = matches.get_flag("verbose");
    let config_manager = config_manager(matches)?;

    // Must work even when the file is unusable
    if let Some(("config", sub)) = matches.subcommand() {
        init_logging(AppConfig::default().log_level, verbose);
        return commands::config_command(&config_manager, sub);
    }

    let config = config_manager
        .load_with_env_overrides()
        .with_context(|| format!("Failed to load {}", config_manager.config_path().display()))?;
    init_logging(config.app.log_level, verbose);

    let data_dir = matches
        .get_one::<PathBuf>("data-dir")
        .cloned()
        .unwrap_or_else(|| config_manager.data_dir(&config));
    log::debug!("Using data directory {}", data_dir.display());

    let mut manager = LibraryManager::open_flat_files(&config, &data_dir)
        .with_context(|| format!("Failed to open the catalog in {}", data_dir.display()))?;
    let default_quantity = config.library.default_quantity;

    match matches.subcommand() {
        Some(("add", sub)) => commands::add_book(&mut manager, sub, default_quantity),
        Some(("list", sub)) => commands::list_books(&manager, sub),
        Some(("search", sub)) => commands::search_books(&manager, sub),
        Some(("issue", sub)) => commands::issue_book(&mut manager, sub),
        Some(("return", sub)) => commands::return_book(&mut manager, sub),
        Some(("user-books", sub)) => commands::user_books(&manager, sub),
        Some(("stats", _)) => commands::show_stats(&manager),
        Some(("export", sub)) => commands::export_catalog(&manager, sub),
        _ => {
            let stdin = std::io::stdin();
            menu::Menu::new(&mut manager, stdin.lock(), std::io::stdout())
                .with_default_quantity(default_quantity)
                .run()
        }
    }
}

fn report_error(err: &anyhow::Error) {
    match err.downcast_ref::<CatalogError>() {
        Some(catalog_err) if !catalog_err.is_critical() => {
            eprintln!("{} {}", style("✗").red().bold(), catalog_err.user_message());
        }
        Some(catalog_err) => {
            log::error!("{:#}", err);
            eprintln!("{} {}", style("✗").red().bold(), catalog_err.user_message());
            eprintln!("  {:#}", err);
        }
        None => eprintln!("{} {:#}", style("Error:").red().bold(), err),
    }
}

fn main() {
    let matches = build_cli().get_matches();

    if let Err(err) = run(&matches) {
        report_error(&err);
        std::process::exit(1);
    }
}
