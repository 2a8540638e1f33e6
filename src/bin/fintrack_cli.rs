use std::path::PathBuf;

use fintrack::{cli::run_cli, init};

fn main() {
    init();

    let data_dir = parse_data_dir();
    if let Err(err) = run_cli(data_dir) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn parse_data_dir() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--data-dir" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
