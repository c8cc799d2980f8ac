//! nsp command-line driver.

mod commands;
mod tracing_setup;

use commands::{explain_error, expand_file, run_file, Options};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];
    match command.as_str() {
        "expand" | "run" => {
            let options = match Options::parse(&args[2..]) {
                Ok(options) => options,
                Err(message) => {
                    eprintln!("error: {message}");
                    eprintln!("Usage: nspc {command} <file.nsp> [-I <dir>]... [--color=<mode>]");
                    std::process::exit(1);
                }
            };
            let ok = if command == "expand" {
                expand_file(&options)
            } else {
                run_file(&options)
            };
            if !ok {
                std::process::exit(1);
            }
        }
        "explain" | "--explain" => {
            if args.len() < 3 {
                eprintln!("Usage: nspc explain <ERROR_CODE>");
                eprintln!("Example: nspc explain E2002");
                std::process::exit(1);
            }
            if !explain_error(&args[2]) {
                std::process::exit(1);
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => {
            println!("nspc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("nsp namespacing engine");
    println!();
    println!("Usage: nspc <command> [options]");
    println!();
    println!("Commands:");
    println!("  expand <file.nsp>    Load a unit and print its rewritten forms");
    println!("  run <file.nsp>       Load a unit and print the global bindings it created");
    println!("  explain <code>       Explain an error code (e.g., E2002)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Options:");
    println!("  -I <dir>             Add a directory to the unit search path");
    println!("  --report             (expand) Print each namespace's symbol table");
    println!("  --separator=<sep>    Join prefixes and short names with <sep> (default -)");
    println!("  --definer=<head>     Treat (<head> name ...) as a definition");
    println!("  --quoted-definer=<head>  Treat (<head> 'name ...) as a definition");
    println!("  --color=<mode>       Diagnostics color: auto, always, never");
    println!();
    println!("Set NSP_LOG (e.g. NSP_LOG=nsp_engine=debug) to trace engine activity.");
}
