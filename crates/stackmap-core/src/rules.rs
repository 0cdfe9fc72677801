/// Tools known to overlap with an all-in-one platform.
///
/// A rule fires for a tool whose normalized name is in `members`. When every
/// member is in the stack the `reason_all` text is used, otherwise
/// `reason_partial`. Single-member rules set both to the same text.
pub struct OverlapRule {
    pub members: &'static [&'static str],
    pub reason_all: &'static str,
    pub reason_partial: &'static str,
    pub suggested_alt: &'static str,
}

impl OverlapRule {
    pub fn applies_to(&self, normalized_name: &str) -> bool {
        self.members.contains(&normalized_name)
    }

    /// Reason text given which members are present in the stack.
    pub fn reason(&self, present: impl Fn(&str) -> bool) -> &'static str {
        if self.members.iter().all(|m| present(m)) {
            self.reason_all
        } else {
            self.reason_partial
        }
    }
}

/// Checked in order; the first rule naming the tool wins.
pub const OVERLAP_RULES: &[OverlapRule] = &[
    OverlapRule {
        members: &["intercom", "zendesk"],
        reason_all: "Intercom and Zendesk overlap in support/messaging. Consider consolidating.",
        reason_partial: "Overlaps with other service tools; consider consolidation.",
        suggested_alt: "HubSpot Service Hub",
    },
    OverlapRule {
        members: &["marketo"],
        reason_all: "Marketo overlaps with full-stack marketing platforms.",
        reason_partial: "Marketo overlaps with full-stack marketing platforms.",
        suggested_alt: "HubSpot Marketing Hub",
    },
];

/// Categories where a lone tool is an essential business function.
pub const KEY_CATEGORIES: &[&str] = &[
    "crm",
    "customer support",
    "helpdesk",
    "service",
    "marketing automation",
    "marketing",
];

pub fn is_key_category(normalized_category: &str) -> bool {
    KEY_CATEGORIES.contains(&normalized_category)
}

pub fn find_overlap_rule(normalized_name: &str) -> Option<&'static OverlapRule> {
    OVERLAP_RULES.iter().find(|r| r.applies_to(normalized_name))
}
