//! Brio CLI.

use std::rc::Rc;

use brio_diagnostic::SourceFile;
use brio_eval::{PrintHandler, Value};
use brio_ir::StringInterner;
use brio_lexer::tokenize;
use brio_parse::parse;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "run" => cmd_run(require_path(&args, "run")),
        "lex" => cmd_lex(require_path(&args, "lex")),
        "parse" => cmd_parse(require_path(&args, "parse")),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("error: unknown command '{other}'");
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: brio <command> <file.brio>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <file.brio>     Run a script");
    eprintln!("  lex <file.brio>     Dump the token stream");
    eprintln!("  parse <file.brio>   Dump the parsed syntax tree");
    eprintln!();
    eprintln!("Set BRIO_LOG (e.g. BRIO_LOG=debug) for internal tracing.");
}

fn require_path<'a>(args: &'a [String], command: &str) -> &'a str {
    match args.get(2) {
        Some(path) => path,
        None => {
            eprintln!("Usage: brio {command} <file.brio>");
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("BRIO_LOG").unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("error: cannot read '{path}': {err}");
            std::process::exit(1);
        }
    }
}

/// Run a script, printing its top-level value if there is one.
fn cmd_run(path: &str) {
    let handler = PrintHandler::stdout();
    match brioc::run_path(path, &handler, Rc::new(StringInterner::new())) {
        Ok(Value::Unit) => {}
        Ok(value) => println!("{value}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn cmd_lex(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    match tokenize(&source, &interner) {
        Ok(tokens) => {
            for token in &tokens {
                println!("{token:?}");
            }
        }
        Err(err) => {
            let file = SourceFile::new(path, &source);
            eprintln!("{}", err.to_diagnostic().render(&file));
            std::process::exit(1);
        }
    }
}

fn cmd_parse(path: &str) {
    let source = read_file(path);
    let interner = StringInterner::new();
    let file = SourceFile::new(path, &source);
    let tokens = match tokenize(&source, &interner) {
        Ok(tokens) => tokens,
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().render(&file));
            std::process::exit(1);
        }
    };
    match parse(&tokens, &interner) {
        Ok(parsed) => {
            println!("root: {:?}", parsed.root);
            for (id, expr) in parsed.arena.iter() {
                println!("{id:?}: {expr:?}");
            }
        }
        Err(err) => {
            eprintln!("{}", err.to_diagnostic().render(&file));
            std::process::exit(1);
        }
    }
}
