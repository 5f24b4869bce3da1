//! Hosts body synthesis
//!
//! Turns the policy document and an instant into the blocked-domain lines
//! appended after the template.

use chrono::{DateTime, TimeZone};
use curfew_api::PolicyDocument;
use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::is_live;

/// Union of the domains of every active group that is live at `now`,
/// sorted ascending. Active names without a group are skipped.
pub fn blocked_domains<Tz: TimeZone>(doc: &PolicyDocument, now: &DateTime<Tz>) -> Vec<String> {
    let domains: BTreeSet<&String> = doc
        .active
        .iter()
        .filter_map(|name| doc.group(name))
        .filter(|group| is_live(group, now))
        .flat_map(|group| group.domains.iter())
        .collect();

    domains.into_iter().cloned().collect()
}

/// Renders blocked domains as hosts-file lines pointing at a blackhole address
#[derive(Debug, Clone)]
pub struct HostsSynthesizer {
    blackhole: IpAddr,
}

impl HostsSynthesizer {
    pub fn new(blackhole: IpAddr) -> Self {
        Self { blackhole }
    }

    pub fn blackhole(&self) -> IpAddr {
        self.blackhole
    }

    /// Body for an already computed domain list.
    ///
    /// Empty for no domains; otherwise one `<blackhole>\t<domain>` line per
    /// domain, each preceded by a newline so the block starts after a blank
    /// separator.
    pub fn render_body(&self, domains: &[String]) -> String {
        domains
            .iter()
            .map(|domain| format!("\n{}\t{}", self.blackhole, domain))
            .collect()
    }

    pub fn synthesize<Tz: TimeZone>(&self, doc: &PolicyDocument, now: &DateTime<Tz>) -> String {
        self.render_body(&blocked_domains(doc, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PolicyEngine;
    use chrono::Local;
    use curfew_util::GroupName;
    use std::net::Ipv4Addr;

    fn monday_at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 12, 29, hour, 0, 0).unwrap()
    }

    fn synthesizer() -> HostsSynthesizer {
        HostsSynthesizer::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 250)))
    }

    fn work_hours_doc() -> PolicyDocument {
        let work = GroupName::new("work");
        let mut engine = PolicyEngine::new(PolicyDocument::initial());
        engine.add_domain(&work, "example.com").unwrap();
        engine.add_hour(&work, "9-17").unwrap();
        engine.add_day(&work, "Monday").unwrap();
        engine.into_document()
    }

    #[test]
    fn test_live_group_blocks_its_domains() {
        let doc = work_hours_doc();
        assert_eq!(blocked_domains(&doc, &monday_at(10)), vec!["example.com"]);
        assert_eq!(
            synthesizer().synthesize(&doc, &monday_at(10)),
            "\n127.0.0.250\texample.com"
        );
    }

    #[test]
    fn test_range_end_is_exclusive() {
        let doc = work_hours_doc();
        assert!(blocked_domains(&doc, &monday_at(17)).is_empty());
        assert_eq!(synthesizer().synthesize(&doc, &monday_at(17)), "");
    }

    #[test]
    fn test_wrong_day_blocks_nothing() {
        let doc = work_hours_doc();
        let tuesday = Local.with_ymd_and_hms(2025, 12, 30, 10, 0, 0).unwrap();
        assert!(blocked_domains(&doc, &tuesday).is_empty());
    }

    #[test]
    fn test_union_is_sorted_and_deduplicated() {
        let mut engine = PolicyEngine::new(PolicyDocument::initial());
        let default = GroupName::default_group();
        let news = GroupName::new("news");
        engine.add_domain(&default, "zeta.org").unwrap();
        engine.add_domain(&default, "example.com").unwrap();
        engine.add_domain(&news, "example.com").unwrap();
        engine.add_domain(&news, "alpha.net").unwrap();
        let doc = engine.into_document();

        let domains = blocked_domains(&doc, &monday_at(3));
        assert_eq!(domains, vec!["alpha.net", "example.com", "zeta.org"]);
        assert_eq!(
            synthesizer().render_body(&domains),
            "\n127.0.0.250\talpha.net\n127.0.0.250\texample.com\n127.0.0.250\tzeta.org"
        );
    }

    #[test]
    fn test_inactive_and_dangling_groups_are_skipped() {
        let mut engine = PolicyEngine::new(PolicyDocument::initial());
        let work = GroupName::new("work");
        engine.add_domain(&work, "example.com").unwrap();
        engine.deactivate(&work);
        let mut doc = engine.into_document();
        doc.active.insert(GroupName::new("ghost"));

        assert!(blocked_domains(&doc, &monday_at(10)).is_empty());
    }

    #[test]
    fn test_emptied_hours_never_live() {
        let mut engine = PolicyEngine::new(PolicyDocument::initial());
        let work = GroupName::new("work");
        engine.add_domain(&work, "example.com").unwrap();
        engine
            .empty_field(&work, curfew_api::FieldKind::Hours)
            .unwrap();
        let doc = engine.into_document();

        for hour in 0..24 {
            assert!(blocked_domains(&doc, &monday_at(hour)).is_empty());
        }
    }

    #[test]
    fn test_ipv6_blackhole() {
        let synth = HostsSynthesizer::new("::1".parse().unwrap());
        assert_eq!(synth.render_body(&["example.com".into()]), "\n::1\texample.com");
    }
}
