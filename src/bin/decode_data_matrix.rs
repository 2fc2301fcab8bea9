//! Decode the Data Matrix symbol in one image file and print its text.
use env_logger::Env;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("error")).init();

    let outcome = rust_dmtx::cli::run(std::env::args_os());
    if let Some(text) = outcome.stdout {
        println!("{text}");
    }
    std::process::exit(outcome.exit_code);
}
