// parsnip: tokenizer and parser inspector for a small statement language

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser as _;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, info};

use parsnip::parser::lexer::Lexer;
use parsnip::parser::parse::{
    ParseError, Parser, ParserConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_EXPRESSION_HEIGHT,
};
use parsnip::parser::scanner::SourceLocation;
use parsnip::ui::App;

#[derive(clap::Parser)]
#[command(
    name = "parsnip",
    about = "Tokenize, parse and inspect parsnip source",
    version
)]
struct Cli {
    /// Source file to read
    #[arg(required_unless_present = "eval", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Use the given text as the source instead of a file
    #[arg(short = 'e', long = "eval", value_name = "TEXT")]
    eval: Option<String>,

    /// Print one line per token (the default)
    #[arg(long, conflicts_with_all = ["ast", "tui"])]
    tokens: bool,

    /// Parse the program and print the syntax tree
    #[arg(long, conflicts_with = "tui")]
    ast: bool,

    /// Open the interactive token and tree inspector
    #[arg(long)]
    tui: bool,

    /// Maximum nesting of parentheses and blocks
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Maximum operator nesting within one expression
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_EXPRESSION_HEIGHT)]
    max_expression_height: usize,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,
}

/// Print a diagnostic for an error at `position` (end of input when `None`).
fn report(source: &str, message: &str, position: Option<usize>, internal: bool) {
    let label = if internal { "internal error" } else { "error" };
    match position {
        Some(offset) => {
            let loc = SourceLocation::from_offset(source, offset);
            eprintln!(
                "{} at line {}, column {}: {}",
                label, loc.line, loc.column, message
            );
        }
        None if internal => eprintln!("{}: {}", label, message),
        None => {
            let loc = SourceLocation::from_offset(source, source.len());
            eprintln!(
                "{} at line {}, column {}: {}",
                label, loc.line, loc.column, message
            );
        }
    }
}

fn report_parse_error(source: &str, err: &ParseError) {
    report(source, &err.to_string(), err.position(), err.is_internal());
}

/// Print every token as `<line>:<col> <KIND>(<lexeme>)`. Returns false on a lexical error.
fn dump_tokens(source: &str) -> io::Result<bool> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut lexer = Lexer::new(source);

    loop {
        match lexer.next_token() {
            Ok(token) => {
                let loc = SourceLocation::from_offset(source, token.span.offset);
                writeln!(
                    out,
                    "{}:{} {}({})",
                    loc.line,
                    loc.column,
                    token.kind.tag(),
                    token.lexeme(source)
                )?;
                if token.is_eof() {
                    return Ok(true);
                }
            }
            Err(err) => {
                out.flush()?;
                report(source, &err.to_string(), err.position(), err.is_internal());
                return Ok(false);
            }
        }
    }
}

fn dump_ast(source: &str, config: ParserConfig) -> bool {
    let result = Parser::with_config(source, config).and_then(|mut parser| parser.parse_program());
    match result {
        Ok(program) => {
            info!(statements = program.len(), "parsed program");
            println!("{:#?}", program);
            true
        }
        Err(err) => {
            report_parse_error(source, &err);
            false
        }
    }
}

fn run_tui(source: String, config: ParserConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, config);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "parsnip=debug"
    } else {
        "parsnip=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let source = if let Some(text) = cli.eval {
        text
    } else if let Some(path) = &cli.file {
        match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Error: cannot read '{}': {}", path.display(), err);
                std::process::exit(1);
            }
        }
    } else {
        eprintln!("Error: no input file provided");
        std::process::exit(1);
    };
    debug!(bytes = source.len(), "loaded source");

    let config = ParserConfig::default()
        .with_max_depth(cli.max_depth)
        .with_max_expression_height(cli.max_expression_height);

    let ok = if cli.tokens || !(cli.ast || cli.tui) {
        dump_tokens(&source)?
    } else if cli.ast {
        dump_ast(&source, config)
    } else {
        run_tui(source, config)?;
        true
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
