//! Request dispatch
//!
//! One invocation runs at most one mutating action, then the optional
//! listing, crontab printout and hosts update, in that order.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use curfew_api::{Confirmation, FieldKind};
use curfew_config::Settings;
use curfew_core::{CoreEvent, HostsSynthesizer, PolicyEngine};
use curfew_host_api::{CacheFlusher, Confirmer};
use curfew_host_unix::HostsFiles;
use curfew_store::PolicyStore;
use curfew_util::{format_timestamp, CurfewError, CurfewResult, GroupName};
use std::io::Write;
use tracing::{debug, info, warn};

use crate::output::{crontab_line, render_view, Palette};

/// The single mutating action of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Remove,
    Empty(FieldKind),
    Add,
    Activate,
    Deactivate,
}

/// Everything an invocation asks for, after flag resolution
#[derive(Debug, Clone, Default)]
pub struct Request {
    pub action: Option<Action>,
    pub group: Option<GroupName>,
    pub domain: Option<String>,
    pub hour: Option<String>,
    pub day: Option<String>,
    pub list: bool,
    pub print_crontab: bool,
    pub update: bool,
    /// Show the new hosts content and ask before writing
    pub confirm: bool,
    /// Remove groups without asking
    pub assume_yes: bool,
    /// Report successful writes with a timestamp for the cron log
    pub cron: bool,
    pub interactive: bool,
}

impl Request {
    fn has_field(&self) -> bool {
        self.domain.is_some() || self.hour.is_some() || self.day.is_some()
    }

    fn required_group(&self, action: &str) -> CurfewResult<GroupName> {
        self.group.clone().ok_or_else(|| {
            CurfewError::validation(format!(
                "Could not {}, no group specified. Pass -g/--group, even for the default group",
                action
            ))
        })
    }
}

pub struct App<W: Write> {
    settings: Settings,
    store: Box<dyn PolicyStore>,
    files: HostsFiles,
    synth: HostsSynthesizer,
    flusher: Box<dyn CacheFlusher>,
    confirmer: Box<dyn Confirmer>,
    palette: Palette,
    out: W,
}

impl<W: Write> App<W> {
    pub fn new(
        settings: Settings,
        store: Box<dyn PolicyStore>,
        flusher: Box<dyn CacheFlusher>,
        confirmer: Box<dyn Confirmer>,
        palette: Palette,
        out: W,
    ) -> Self {
        let files = HostsFiles::new(
            &settings.hosts.live,
            &settings.hosts.original,
            &settings.hosts.template,
        );
        let synth = HostsSynthesizer::new(settings.hosts.blackhole);
        Self {
            settings,
            store,
            files,
            synth,
            flusher,
            confirmer,
            palette,
            out,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub fn run(&mut self, request: &Request, now: &DateTime<Local>) -> Result<()> {
        if request.interactive {
            return Err(CurfewError::not_implemented(
                "interactive mode is not supported yet, see --help for the available flags",
            )
            .into());
        }

        let document = self
            .store
            .load()
            .map_err(CurfewError::from)
            .with_context(|| format!("Failed to load policy from {}", self.store.describe()))?;
        let mut engine = PolicyEngine::new(document);
        let mut update = request.update;

        if let Some(action) = request.action {
            let mut staged = engine.clone();
            match self.apply_action(&mut staged, action, request) {
                Ok(events) if events.is_empty() => {
                    debug!(action = ?action, "Nothing changed");
                }
                Ok(events) => {
                    for event in &events {
                        debug!(event = ?event, "Policy changed");
                    }
                    self.store
                        .save(staged.document())
                        .map_err(CurfewError::from)
                        .context("Failed to save policy")?;
                    info!(action = ?action, changes = events.len(), "Policy saved");
                    engine = staged;
                    update = true;
                }
                Err(e) if !e.is_fatal() => self.report(&e)?,
                Err(e) => return Err(e.into()),
            }
        }

        if request.list {
            self.list(&engine, request.group.as_ref(), now)?;
        }

        if request.print_crontab {
            self.print_crontab()?;
        }

        if update {
            self.update_hosts(&engine, request, now)?;
        }

        Ok(())
    }

    fn apply_action(
        &self,
        engine: &mut PolicyEngine,
        action: Action,
        request: &Request,
    ) -> CurfewResult<Vec<CoreEvent>> {
        match action {
            Action::Remove => {
                let group = request.required_group("remove")?;
                if request.has_field() {
                    return remove_fields(engine, &group, request);
                }
                if engine.document().group(&group).is_none() {
                    return Err(CurfewError::not_found(&group));
                }
                if !request.assume_yes {
                    let prompt = format!("Are you sure you want to delete the group {}?", group);
                    match self.confirmer.confirm(&prompt, None)? {
                        Confirmation::Yes => {}
                        Confirmation::No => {
                            info!(group = %group, "Group kept");
                            return Ok(Vec::new());
                        }
                        Confirmation::Quit => return Err(CurfewError::UserAbort),
                    }
                }
                engine.remove_group(&group)
            }
            Action::Empty(field) => {
                let group = request.required_group("empty field")?;
                engine.empty_field(&group, field)
            }
            Action::Add => {
                let group = request
                    .group
                    .clone()
                    .unwrap_or_else(GroupName::default_group);
                if !request.has_field() {
                    return engine.ensure_group(&group);
                }
                let mut events = Vec::new();
                if let Some(hour) = &request.hour {
                    events.extend(engine.add_hour(&group, hour)?);
                }
                if let Some(day) = &request.day {
                    events.extend(engine.add_day(&group, day)?);
                }
                if let Some(domain) = &request.domain {
                    events.extend(engine.add_domain(&group, domain)?);
                }
                Ok(events)
            }
            Action::Activate => {
                let group = request.required_group("activate")?;
                Ok(engine.activate(&group))
            }
            Action::Deactivate => {
                let group = request.required_group("deactivate")?;
                Ok(engine.deactivate(&group))
            }
        }
    }

    fn list(
        &mut self,
        engine: &PolicyEngine,
        group: Option<&GroupName>,
        now: &DateTime<Local>,
    ) -> Result<()> {
        let views = match group {
            Some(name) => match engine.view(name, now) {
                Ok(view) => vec![view],
                Err(e) if !e.is_fatal() => return self.report(&e),
                Err(e) => return Err(e.into()),
            },
            None => engine.list(now),
        };

        for view in &views {
            writeln!(self.out, "{}", render_view(view, &self.palette))?;
        }
        Ok(())
    }

    fn print_crontab(&mut self) -> Result<()> {
        let exe = std::env::current_exe().context("Failed to locate the curfew executable")?;
        let log_file = std::path::absolute(&self.settings.log_file)
            .unwrap_or_else(|_| self.settings.log_file.clone());

        writeln!(
            self.out,
            "Add the following to the root crontab (e.g. $ sudo crontab -e):"
        )?;
        writeln!(self.out, "{}", crontab_line(&exe, &log_file))?;
        Ok(())
    }

    fn update_hosts(
        &mut self,
        engine: &PolicyEngine,
        request: &Request,
        now: &DateTime<Local>,
    ) -> Result<()> {
        self.files
            .ensure_bootstrap()
            .map_err(CurfewError::from)
            .context("Failed to prepare hosts files")?;
        let template = self
            .files
            .read_template()
            .map_err(CurfewError::from)
            .context("Failed to read hosts template")?;

        let body = self.synth.synthesize(engine.document(), now);
        let content = self.files.render(&template, &body);

        if request.confirm {
            let prompt = format!(
                "Write the above content to the hosts file {}?",
                self.files.live().display()
            );
            match self
                .confirmer
                .confirm(&prompt, Some(&content))
                .map_err(CurfewError::from)?
            {
                Confirmation::Yes => {}
                Confirmation::No => {
                    info!("Hosts file left unchanged");
                    return Ok(());
                }
                Confirmation::Quit => return Err(CurfewError::UserAbort.into()),
            }
        }

        self.files
            .apply(&content, self.flusher.as_ref())
            .map_err(CurfewError::from)
            .with_context(|| format!("Failed to write {}", self.files.live().display()))?;

        if request.cron {
            writeln!(
                self.out,
                "{} Successfully wrote to the hosts file: {}",
                format_timestamp(now),
                self.files.live().display()
            )?;
        }
        Ok(())
    }

    /// Print a locally recovered error; the invocation carries on.
    fn report(&mut self, error: &CurfewError) -> Result<()> {
        warn!(error = %error, "Request rejected");
        writeln!(self.out, "{} {}", self.palette.red("Error"), error)?;
        Ok(())
    }
}

fn remove_fields(
    engine: &mut PolicyEngine,
    group: &GroupName,
    request: &Request,
) -> CurfewResult<Vec<CoreEvent>> {
    let fields = [
        (FieldKind::Days, &request.day),
        (FieldKind::Domains, &request.domain),
        (FieldKind::Hours, &request.hour),
    ];

    let mut events = Vec::new();
    for (field, value) in fields {
        if let Some(value) = value {
            events.extend(engine.remove_field(group, field, value)?);
        }
    }
    Ok(events)
}
