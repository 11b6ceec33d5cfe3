use codeconvert::config::{API_KEY_ENV, AppConfig};
use codeconvert::lister;
use codeconvert::llm::gemini::GeminiBuilder;
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let api_key = match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => prompt_for_key()?,
    };

    let mut stdout = io::stdout().lock();
    let catalog = AppConfig::load()
        .map_err(|e| codeconvert::LLMError::OtherError(e.into()))
        .and_then(|cfg| GeminiBuilder::new(cfg).catalog(&api_key));
    match catalog {
        Ok(catalog) => lister::run(&catalog, &mut stdout).await?,
        Err(e) => {
            writeln!(stdout, "Checking available models...")?;
            writeln!(stdout, "Error: {}", e)?;
        }
    }
    Ok(())
}

fn prompt_for_key() -> io::Result<String> {
    print!("Enter your Google API Key: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}
