use std::io::Read;
use std::path::Path;

/// Read SQL from `file`, or from stdin when there is none.
///
/// Returns a label for diagnostics along with the text.
pub fn read_input(file: Option<&Path>) -> anyhow::Result<(String, String)> {
    match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
            Ok((path.display().to_string(), content))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| anyhow::anyhow!("failed to read stdin: {e}"))?;
            if buf.trim().is_empty() {
                anyhow::bail!("no SQL provided (pass a file or pipe SQL to stdin)");
            }
            Ok(("stdin".to_string(), buf))
        }
    }
}
