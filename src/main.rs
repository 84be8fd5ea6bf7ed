fn main() {
    if let Err(err) = v2ex_cli::run() {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}
