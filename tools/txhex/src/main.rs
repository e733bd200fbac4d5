mod cli;

use serde_json::json;

fn main() {
    match cli::run_cli() {
        Ok(output) => println!("{output:#}"),
        Err(e) => {
            println!("{}", json!({ "error": format!("{e:#}") }));
            std::process::exit(1);
        }
    }
}
