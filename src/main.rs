fn main() {
    if let Err(err) = case_explorer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
