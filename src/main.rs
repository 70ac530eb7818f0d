use std::process::exit;

fn main() {
    if let Err(e) = fitscout::app::run_cli() {
        eprintln!("{e}");
        exit(1);
    }
}
