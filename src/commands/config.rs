use owo_colors::OwoColorize;

use crate::config::Config;
use crate::error::Result;

/// Show the effective configuration.
pub fn cmd_config_show() -> Result<()> {
    let config = Config::load()?;

    println!("{}", "Configuration:".bold());
    println!("  file:            {}", Config::config_path()?.display().dimmed());
    println!("  api_base_url:    {}", config.api_base_url().cyan());
    println!("  request_timeout: {}s", config.request_timeout);
    println!("  data_dir:        {}", config.data_dir()?.display());
    Ok(())
}
