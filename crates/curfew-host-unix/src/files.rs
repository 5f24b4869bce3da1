//! Hosts file lifecycle
//!
//! Three roles are involved: the live file the resolver reads, a pristine
//! backup taken on first run, and an editable template every regeneration
//! starts from.

use curfew_host_api::{CacheFlusher, HostError, HostResult};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Paths of the three hosts-file roles
#[derive(Debug, Clone)]
pub struct HostsFiles {
    live: PathBuf,
    original: PathBuf,
    template: PathBuf,
}

impl HostsFiles {
    pub fn new(
        live: impl Into<PathBuf>,
        original: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            live: live.into(),
            original: original.into(),
            template: template.into(),
        }
    }

    pub fn live(&self) -> &Path {
        &self.live
    }

    pub fn original(&self) -> &Path {
        &self.original
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Create the backup and the template on first run.
    ///
    /// Existing backup and template files are never touched again.
    pub fn ensure_bootstrap(&self) -> HostResult<()> {
        if !self.live.exists() {
            return Err(HostError::MissingFile {
                path: self.live.clone(),
                message: "hosts file does not exist".into(),
            });
        }

        if !self.original.exists() {
            fs::copy(&self.live, &self.original).map_err(|e| HostError::MissingFile {
                path: self.original.clone(),
                message: format!("could not back up {}: {}", self.live.display(), e),
            })?;
            info!(
                from = %self.live.display(),
                to = %self.original.display(),
                "Backed up original hosts file"
            );
        }

        if !self.template.exists() {
            fs::copy(&self.original, &self.template).map_err(|e| HostError::MissingFile {
                path: self.template.clone(),
                message: format!("could not create from {}: {}", self.original.display(), e),
            })?;
            info!(
                from = %self.original.display(),
                to = %self.template.display(),
                "Created hosts template"
            );
        }

        Ok(())
    }

    pub fn read_template(&self) -> HostResult<String> {
        fs::read_to_string(&self.template).map_err(|e| HostError::MissingFile {
            path: self.template.clone(),
            message: format!("could not read hosts template: {}", e),
        })
    }

    /// Template, then the generated-section banner, then the domain body.
    pub fn render(&self, template: &str, body: &str) -> String {
        format!("{}{}{}", template, self.banner(), body)
    }

    fn banner(&self) -> String {
        format!(
            "\n##\n\
             # WARNING\n\
             #\n\
             # This file is generated by curfew. Changes made here are erased the\n\
             # next time it is generated. Make changes in {}.\n\
             #\n\
             # The original hosts file is kept at {}. Disable the curfew\n\
             # cron job before restoring it.\n\
             ##\n",
            self.template.display(),
            self.original.display()
        )
    }

    /// Replace the live file with `content`, then flush the resolver cache.
    ///
    /// The new content is written to a temporary file next to the live file
    /// and renamed over it, keeping the live file's permissions. A failed
    /// flush is only logged.
    pub fn apply(&self, content: &str, flusher: &dyn CacheFlusher) -> HostResult<()> {
        let dir = self
            .live
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let permissions = fs::metadata(&self.live)
            .map_err(|e| HostError::io(&self.live, e))?
            .permissions();

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| HostError::io(dir, e))?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| HostError::io(tmp.path(), e))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| HostError::io(tmp.path(), e))?;
        fs::set_permissions(tmp.path(), permissions).map_err(|e| HostError::io(tmp.path(), e))?;
        tmp.persist(&self.live)
            .map_err(|e| HostError::io(&self.live, e.error))?;

        info!(path = %self.live.display(), bytes = content.len(), "Hosts file written");

        match flusher.flush() {
            Ok(()) => debug!(backend = %flusher.backend(), "Resolver cache invalidated"),
            Err(e) => warn!(error = %e, "Could not flush resolver cache"),
        }
        Ok(())
    }
}
