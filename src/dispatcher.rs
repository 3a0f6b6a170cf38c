use libxml::tree::Node;
use log::{debug, error, info, warn};

use crate::config::{SiteRule, SiteRuleTable};
use crate::constants;
use crate::date::DateNormalizer;
use crate::fix::{Fix, TextFix};
use crate::observer::{ObserveOptions, ObserverId};
use crate::page::Page;

struct Watcher {
    entry: usize,
    observer: ObserverId,
    roots: Vec<Node>,
}

/// What a run of the dispatcher did to a page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Names of the site rules that matched the page.
    pub active: Vec<String>,
    /// Number of nodes changed by the initial pass.
    pub rewritten: usize,
    /// Number of mutation watchers armed.
    pub watchers: usize,
}

/// Applies the site rule table to a page and keeps it applied while the
/// page changes.
pub struct Dispatcher {
    site_rules: SiteRuleTable,
    normalizer: DateNormalizer,
    watchers: Vec<Watcher>,
}

impl Dispatcher {
    pub fn new(site_rules: SiteRuleTable, normalizer: DateNormalizer) -> Self {
        Self {
            site_rules,
            normalizer,
            watchers: Vec::new(),
        }
    }

    pub fn site_rules(&self) -> &SiteRuleTable {
        &self.site_rules
    }

    pub fn normalizer(&self) -> &DateNormalizer {
        &self.normalizer
    }

    /// Evaluates every site rule against `page` in table order. Matching
    /// entries get their stylesheet, an initial pass and, if configured, a
    /// watcher. Watchers armed by an earlier run are released first.
    pub fn run(&mut self, page: &mut Page) -> DispatchReport {
        info!("Normalizing dates of '{}'", page.url().as_str());

        for stale in self.watchers.drain(..) {
            page.release_observer(stale.observer);
        }

        let mut report = DispatchReport::default();
        let mut watchers = Vec::new();

        for (index, entry) in self.site_rules.entries().iter().enumerate() {
            if !Self::is_active(entry, page) {
                continue;
            }
            debug!("Site rule '{}' matches '{}'", entry.name, page.host());
            report.active.push(entry.name.clone());

            if let Some(css) = entry.css.as_deref() {
                if let Err(error) = page.inject_stylesheet(css) {
                    error!("Injecting stylesheet of '{}' failed: {}", entry.name, error);
                }
            }

            report.rewritten += Self::execute(entry, page, &self.normalizer);

            if let Some(watcher) = Self::arm_watcher(index, entry, page) {
                watchers.push(watcher);
            }
        }

        report.watchers = watchers.len();
        self.watchers = watchers;

        info!(
            "{} site rules active, {} nodes rewritten, {} watchers",
            report.active.len(),
            report.rewritten,
            report.watchers
        );
        report
    }

    pub fn is_active(entry: &SiteRule, page: &Page) -> bool {
        if !entry.domain.matches(page.host()) {
            return false;
        }

        match entry.require.as_deref() {
            Some(xpath) => page.exists(xpath),
            None => true,
        }
    }

    /// Applies every rule of `entry` to the nodes it selects and returns
    /// the number of changed nodes. Failing nodes are logged and skipped.
    pub fn execute(entry: &SiteRule, page: &mut Page, normalizer: &DateNormalizer) -> usize {
        let mut changed = 0;

        for rule in &entry.rules {
            let fix: &dyn Fix = match rule.fix.as_deref() {
                Some(fix) => fix,
                None => &TextFix,
            };

            for mut node in page.select(&rule.xpath) {
                match fix.apply(page, &mut node, normalizer) {
                    Ok(true) => changed += 1,
                    Ok(false) => {}
                    Err(error) => warn!(
                        "Applying {} to '{}' of '{}' failed: {}",
                        fix.describe(),
                        rule.xpath,
                        entry.name,
                        error
                    ),
                }
            }
        }

        changed
    }

    /// Delivers the records queued for the dispatcher's watchers, re-running
    /// the entry of every notified watcher while it is paused. Repeats until
    /// nothing is queued for them and returns the number of deliveries.
    /// Queues of other observers of the page are left alone.
    pub fn process_mutations(&self, page: &mut Page) -> usize {
        let mut deliveries = 0;

        for _ in 0..constants::MAX_DELIVERY_ROUNDS {
            let mut delivered = false;

            for watcher in &self.watchers {
                let records = page.take_pending_mutations_for(watcher.observer);
                if records.is_empty() {
                    continue;
                }

                let entry = &self.site_rules.entries()[watcher.entry];
                debug!("{} mutations observed for '{}'", records.len(), entry.name);

                let mut paused = page.pause_observer(
                    watcher.observer,
                    &watcher.roots,
                    ObserveOptions::subtree_children(),
                );
                Self::execute(entry, &mut paused, &self.normalizer);
                deliveries += 1;
                delivered = true;
            }

            if !delivered {
                return deliveries;
            }
        }

        if self
            .watchers
            .iter()
            .any(|watcher| page.has_pending_mutations_for(watcher.observer))
        {
            warn!(
                "Mutations still pending after {} rounds, site rules may be triggering each other",
                constants::MAX_DELIVERY_ROUNDS
            );
        }
        deliveries
    }

    fn arm_watcher(index: usize, entry: &SiteRule, page: &mut Page) -> Option<Watcher> {
        if entry.observe.is_empty() {
            return None;
        }

        let roots: Vec<Node> = entry
            .observe
            .iter()
            .flat_map(|xpath| page.select(xpath))
            .collect();
        if roots.is_empty() {
            debug!("Nothing to observe for '{}'", entry.name);
            return None;
        }

        let observer = page.create_observer();
        for root in &roots {
            if let Err(error) = page.observe(observer, root, ObserveOptions::subtree_children()) {
                error!("Observing root of '{}' failed: {}", entry.name, error);
            }
        }

        Some(Watcher {
            entry: index,
            observer,
            roots,
        })
    }
}
