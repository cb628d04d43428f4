use anyhow::Result;

use lumen_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            println!("Remove it first to regenerate the defaults.");
        } else {
            AppConfig::default().save_to(&path)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let status = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# {}{}", path.display(), status);
    println!("# log file: {}\n", config.log_path().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
