fn main() {
    if let Err(e) = wavecat::app::run_cli() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
