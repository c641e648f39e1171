//! Show or save the effective configuration.

use bowsync_common::config::AppConfig;

pub fn run(config: &AppConfig, write: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(config)?);

    if write {
        let path = config.save()?;
        println!("\nConfiguration saved to: {}", path.display());
    }

    Ok(())
}
