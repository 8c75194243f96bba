mod logging;

pub use logging::init_logging;

use dns_relay_domain::{CliOverrides, Config, RuleTable};
use dns_relay_infrastructure::rules::load_rule_table;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, overrides)?;
    config.validate()?;
    Ok(config)
}

pub fn load_rules(config: &Config) -> anyhow::Result<RuleTable> {
    Ok(load_rule_table(&config.rules.path)?)
}
