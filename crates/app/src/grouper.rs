//! Capability grouper — partitions visible capability names into groups.
//!
//! A capability identifier is `base` or `base.group` (split on the first
//! `.`). Devices name the "primary" instance of a capability with no
//! suffix, so the empty group is the default.

/// Ordered partition of base capabilities by group key.
///
/// Ordering is an explicit property of this structure: groups keep the
/// order in which their keys were first seen, and each group keeps the
/// order in which its capabilities arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityGroups {
    groups: Vec<(String, Vec<String>)>,
}

impl CapabilityGroups {
    /// Partition a device's visible capability identifiers into groups.
    #[must_use]
    pub fn from_visible<S: AsRef<str>>(visible: &[S]) -> Self {
        let mut groups: Vec<(String, Vec<String>)> = Vec::new();
        for identifier in visible {
            let identifier = identifier.as_ref();
            let (base, group) = match identifier.split_once('.') {
                Some((base, group)) => (base, group),
                None => (identifier, ""),
            };
            match groups.iter_mut().find(|(key, _)| key == group) {
                Some((_, bases)) => bases.push(base.to_string()),
                None => groups.push((group.to_string(), vec![base.to_string()])),
            }
        }
        Self { groups }
    }

    /// Deduplicate base capabilities across groups, first-wins.
    ///
    /// Groups are ordered by ascending key length (the empty/default group
    /// is shortest, so it wins ties); a base capability already claimed by
    /// an earlier group is dropped from later ones. Groups left empty are
    /// removed. Flattening an already-flattened set is a no-op.
    ///
    /// Equal-length keys keep their input order; no further tie-break is
    /// applied.
    #[must_use]
    pub fn flatten(&self) -> Self {
        let mut ordered: Vec<&(String, Vec<String>)> = self.groups.iter().collect();
        ordered.sort_by_key(|(key, _)| key.len());

        let mut claimed: Vec<String> = Vec::new();
        let mut groups = Vec::new();
        for (key, bases) in ordered {
            let kept: Vec<String> = bases
                .iter()
                .filter(|base| !claimed.contains(*base))
                .cloned()
                .collect();
            claimed.extend(kept.iter().cloned());
            if !kept.is_empty() {
                groups.push((key.clone(), kept));
            }
        }
        Self { groups }
    }

    /// Iterate groups as `(group_key, base_capabilities)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups
            .iter()
            .map(|(key, bases)| (key.as_str(), bases.as_slice()))
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Reassemble the full capability name for a base within a group.
    #[must_use]
    pub fn full_name(group: &str, base: &str) -> String {
        if group.is_empty() {
            base.to_string()
        } else {
            format!("{base}.{group}")
        }
    }
}
