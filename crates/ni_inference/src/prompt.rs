use std::path::{Path, PathBuf};

use ni_core::{Error, Result};
use tracing::debug;

/// Renders article text into a named template read from disk.
///
/// Templates live in `<dir>/<name>_prompt.txt` and are read on every call,
/// so edits take effect without a restart.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template_dir: PathBuf,
}

impl PromptBuilder {
    pub fn new(template_dir: impl AsRef<Path>) -> Self {
        Self {
            template_dir: template_dir.as_ref().to_path_buf(),
        }
    }

    pub fn template_path(&self, name: &str) -> Result<PathBuf> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(Error::TemplateMissing {
                name: name.to_string(),
                reason: "invalid template name".to_string(),
            });
        }
        Ok(self.template_dir.join(format!("{}_prompt.txt", name)))
    }

    pub async fn build(&self, text: &str, template: &str) -> Result<String> {
        let path = self.template_path(template)?;
        let prefix = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::TemplateMissing {
                name: template.to_string(),
                reason: format!("{}: {}", path.display(), e),
            })?;

        let prompt = format!("{}\n\n<article>Article text: {}\n</article>", prefix, text);
        debug!("Generated '{}' prompt ({} chars)", template, prompt.len());
        Ok(prompt)
    }
}
