// src/watch/aggregate.rs
use crate::signal::{Link, Point, Signal, LINK_LABEL};
use crate::watch::category::{active_list_url, Category};
use crate::watch::types::{ChangeEvent, ChangeKind};

/// Accumulates one cycle's changes into the message and link of a single
/// coalesced signal.
///
/// The link latches one way: the first change points at that item's detail
/// page; the moment a second change appears anywhere in the cycle the link
/// becomes the generic active-projects list and stays there.
#[derive(Debug)]
pub struct SignalDraft {
    subdomain: String,
    lines: Vec<String>,
    link_url: Option<String>,
}

impl SignalDraft {
    pub fn new(subdomain: &str) -> Self {
        Self {
            subdomain: subdomain.to_string(),
            lines: Vec::new(),
            link_url: None,
        }
    }

    pub fn push(&mut self, ev: &ChangeEvent) {
        let spec = ev.category.spec();
        let line = match ev.kind {
            ChangeKind::Created => format!("New {}: {}.", spec.noun, ev.item.label),
            ChangeKind::Updated => match (ev.category, &ev.item.project) {
                (Category::Projects, _) => format!("Update in {} project.", ev.item.label),
                (_, Some(project)) => format!(
                    "Update in {} {} in {} project.",
                    ev.item.label, spec.noun, project
                ),
                (_, None) => format!("Update in {} {}.", ev.item.label, spec.noun),
            },
        };
        self.lines.push(line);

        match self.lines.len() {
            1 => self.link_url = Some(spec.item_url(&self.subdomain, &ev.item.id)),
            2 => self.link_url = Some(active_list_url(&self.subdomain)),
            _ => {} // latched on the generic list
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Render the finished signal; `None` when the cycle produced no changes.
    pub fn finish(self, color: &str, effect: &str) -> Option<Signal> {
        let url = self.link_url?;
        Some(Signal::notify(
            self.lines.join("<br>"),
            Point {
                color: color.to_string(),
                effect: effect.to_string(),
            },
            Link {
                url,
                label: LINK_LABEL.to_string(),
            },
        ))
    }
}
