//! Group rule engine
//!
//! Mutations on the policy document. Every operation validates its input
//! before touching the document, so a rejected request leaves it exactly as
//! it was.

use chrono::{DateTime, TimeZone};
use curfew_api::{
    normalize_domain, DaySpec, FieldKind, Group, GroupView, HourSpec, PolicyDocument, Spec,
};
use curfew_util::{CurfewError, CurfewResult, GroupName, DEFAULT_GROUP};
use tracing::{debug, info};

use crate::{is_live, CoreEvent};

/// Owns the in-memory policy document for one invocation
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    document: PolicyDocument,
}

impl PolicyEngine {
    pub fn new(document: PolicyDocument) -> Self {
        debug!(
            group_count = document.groups.len(),
            active_count = document.active.len(),
            "Policy engine initialized"
        );
        Self { document }
    }

    pub fn document(&self) -> &PolicyDocument {
        &self.document
    }

    pub fn into_document(self) -> PolicyDocument {
        self.document
    }

    /// Create the group if it is unknown and make sure it is active.
    pub fn ensure_group(&mut self, group: &GroupName) -> CurfewResult<Vec<CoreEvent>> {
        check_name(group)?;
        let mut events = Vec::new();
        self.touch(group, &mut events);
        Ok(events)
    }

    /// Add a domain, creating and activating the group as needed.
    pub fn add_domain(&mut self, group: &GroupName, domain: &str) -> CurfewResult<Vec<CoreEvent>> {
        check_name(group)?;
        let domain = normalize_domain(domain)?;

        let mut events = Vec::new();
        let entry = self.touch(group, &mut events);
        if entry.domains.insert(domain.clone()) {
            debug!(group = %group, domain = %domain, "Domain added");
            events.push(CoreEvent::DomainAdded {
                group: group.clone(),
                domain,
            });
        }
        Ok(events)
    }

    /// Add an hour spec (`8`, `9-17` or `*`), creating and activating the
    /// group as needed.
    pub fn add_hour(&mut self, group: &GroupName, spec: &str) -> CurfewResult<Vec<CoreEvent>> {
        check_name(group)?;
        let spec: Spec<HourSpec> = spec.parse()?;

        let mut events = Vec::new();
        let entry = self.touch(group, &mut events);
        if entry.hours.add(spec) {
            let hours = entry.hours.tokens();
            debug!(group = %group, hours = ?hours, "Hours changed");
            events.push(CoreEvent::HoursChanged {
                group: group.clone(),
                hours,
            });
        }
        Ok(events)
    }

    /// Add a day spec (`Monday` .. `Sunday` or `*`), creating and activating
    /// the group as needed.
    pub fn add_day(&mut self, group: &GroupName, spec: &str) -> CurfewResult<Vec<CoreEvent>> {
        check_name(group)?;
        let spec: Spec<DaySpec> = spec.parse()?;

        let mut events = Vec::new();
        let entry = self.touch(group, &mut events);
        if entry.days.add(spec) {
            let days = entry.days.tokens();
            debug!(group = %group, days = ?days, "Days changed");
            events.push(CoreEvent::DaysChanged {
                group: group.clone(),
                days,
            });
        }
        Ok(events)
    }

    /// Delete a group and drop it from the active list.
    ///
    /// Callers are expected to have confirmed this with the user.
    pub fn remove_group(&mut self, group: &GroupName) -> CurfewResult<Vec<CoreEvent>> {
        if !self.document.groups.contains_key(group) {
            return Err(CurfewError::not_found(group));
        }
        if group.as_str() == DEFAULT_GROUP {
            return Err(CurfewError::validation(
                "The default group cannot be removed; empty its fields instead",
            ));
        }

        self.document.groups.remove(group);
        self.document.active.remove(group);
        info!(group = %group, "Group removed");
        Ok(vec![CoreEvent::GroupRemoved {
            group: group.clone(),
        }])
    }

    /// Remove one value from a field. Absent values are a no-op.
    pub fn remove_field(
        &mut self,
        group: &GroupName,
        field: FieldKind,
        value: &str,
    ) -> CurfewResult<Vec<CoreEvent>> {
        let entry = self
            .document
            .groups
            .get_mut(group)
            .ok_or_else(|| CurfewError::not_found(group))?;

        let (removed, value) = match field {
            FieldKind::Domains => {
                let domain = normalize_domain(value)?;
                (entry.domains.remove(&domain), domain)
            }
            FieldKind::Hours => {
                let spec: Spec<HourSpec> = value.parse()?;
                (entry.hours.remove(&spec), spec.to_string())
            }
            FieldKind::Days => {
                let spec: Spec<DaySpec> = value.parse()?;
                (entry.days.remove(&spec), spec.to_string())
            }
        };

        if !removed {
            debug!(group = %group, field = %field, value = %value, "Value not present");
            return Ok(Vec::new());
        }

        debug!(group = %group, field = %field, value = %value, "Value removed");
        Ok(vec![CoreEvent::ValueRemoved {
            group: group.clone(),
            field,
            value,
        }])
    }

    /// Clear a field. Cleared hours or days match nothing until repopulated.
    pub fn empty_field(
        &mut self,
        group: &GroupName,
        field: FieldKind,
    ) -> CurfewResult<Vec<CoreEvent>> {
        let entry = self
            .document
            .groups
            .get_mut(group)
            .ok_or_else(|| CurfewError::not_found(group))?;

        let changed = match field {
            FieldKind::Domains => {
                let had_domains = !entry.domains.is_empty();
                entry.domains.clear();
                had_domains
            }
            FieldKind::Hours => entry.hours.clear(),
            FieldKind::Days => entry.days.clear(),
        };

        if !changed {
            return Ok(Vec::new());
        }

        debug!(group = %group, field = %field, "Field emptied");
        Ok(vec![CoreEvent::FieldEmptied {
            group: group.clone(),
            field,
        }])
    }

    /// Put an existing group on the active list. Unknown groups are ignored.
    pub fn activate(&mut self, group: &GroupName) -> Vec<CoreEvent> {
        if !self.document.groups.contains_key(group) {
            debug!(group = %group, "Not activating unknown group");
            return Vec::new();
        }
        if !self.document.active.insert(group.clone()) {
            return Vec::new();
        }
        info!(group = %group, "Group activated");
        vec![CoreEvent::Activated {
            group: group.clone(),
        }]
    }

    /// Take an existing group off the active list. Unknown groups are ignored.
    pub fn deactivate(&mut self, group: &GroupName) -> Vec<CoreEvent> {
        if !self.document.groups.contains_key(group) {
            debug!(group = %group, "Not deactivating unknown group");
            return Vec::new();
        }
        if !self.document.active.remove(group) {
            return Vec::new();
        }
        info!(group = %group, "Group deactivated");
        vec![CoreEvent::Deactivated {
            group: group.clone(),
        }]
    }

    /// Status of every group at `now`, ordered by name
    pub fn list<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<GroupView> {
        self.document
            .groups
            .iter()
            .map(|(name, group)| self.view_of(name, group, now))
            .collect()
    }

    /// Status of one group at `now`
    pub fn view<Tz: TimeZone>(&self, group: &GroupName, now: &DateTime<Tz>) -> CurfewResult<GroupView> {
        self.document
            .group(group)
            .map(|entry| self.view_of(group, entry, now))
            .ok_or_else(|| CurfewError::not_found(group))
    }

    fn view_of<Tz: TimeZone>(&self, name: &GroupName, group: &Group, now: &DateTime<Tz>) -> GroupView {
        GroupView::from_group(name, group, self.document.is_active(name), is_live(group, now))
    }

    /// Fetch the group, creating it with wildcard hours and days if needed,
    /// and make sure it is active.
    fn touch(&mut self, group: &GroupName, events: &mut Vec<CoreEvent>) -> &mut Group {
        if !self.document.groups.contains_key(group) {
            info!(group = %group, "Group created");
            events.push(CoreEvent::GroupCreated {
                group: group.clone(),
            });
        }
        if self.document.active.insert(group.clone()) {
            events.push(CoreEvent::Activated {
                group: group.clone(),
            });
        }
        self.document.groups.entry(group.clone()).or_default()
    }
}

fn check_name(group: &GroupName) -> CurfewResult<()> {
    if group.is_empty() {
        return Err(CurfewError::validation("Group name cannot be empty"));
    }
    Ok(())
}
