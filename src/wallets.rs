use anyhow::{Context, Result};
use std::path::Path;

/// Canonical form of an address: trimmed, `0x`-prefixed, lowercase.
pub fn normalize_address(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        trimmed.to_lowercase()
    } else {
        format!("0x{}", trimmed.to_lowercase())
    }
}

/// Loads the input wallet list from a line-oriented file.
///
/// Blank lines and `#` comments are skipped; every surviving line is
/// normalized. Input order is preserved.
pub fn read_wallets(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read wallet list from {}", path.display()))?;
    Ok(parse_wallets(&contents))
}

fn parse_wallets(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(normalize_address)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blanks_and_comments() {
        let input = "# watchlist\n0xAAA\n\n   \nbbb\n# trailing comment\n";
        let wallets = parse_wallets(input);
        assert_eq!(wallets, vec!["0xaaa", "0xbbb"]);
    }

    #[test]
    fn prefixes_and_lowercases() {
        assert_eq!(normalize_address("DEADBEEF"), "0xdeadbeef");
        assert_eq!(normalize_address("0xDeadBeef"), "0xdeadbeef");
        assert_eq!(normalize_address("  0xAb01  "), "0xab01");
    }

    #[test]
    fn preserves_input_order() {
        let wallets = parse_wallets("0xccc\n0xaaa\n0xbbb\n");
        assert_eq!(wallets, vec!["0xccc", "0xaaa", "0xbbb"]);
    }
}
