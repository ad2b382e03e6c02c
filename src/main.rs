fn main() {
    use ethica_explorer::cli::parse;
    let cli = parse();
    let code = ethica_explorer::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
