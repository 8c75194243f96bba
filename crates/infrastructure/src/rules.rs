use dns_relay_domain::{DomainError, RuleTable};
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, trace, warn};

/// Reads the rule file at `path`.
///
/// A missing file yields an empty table. Unreadable or malformed files and
/// unparsable addresses are errors.
pub fn load_rule_table(path: impl AsRef<Path>) -> Result<RuleTable, DomainError> {
    let path = path.as_ref();

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Rule file not found, starting without local rules");
            return Ok(RuleTable::new());
        }
        Err(e) => {
            return Err(DomainError::InvalidRuleTable(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };

    let table = RuleTable::from_json_str(&contents)?;

    info!(path = %path.display(), rules = table.len(), "Rules loaded");
    for domain in table.domains() {
        trace!(domain, "Rule registered");
    }

    Ok(table)
}
