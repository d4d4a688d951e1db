//! Content filter groups and tag classification.
//!
//! A filter group maps a set of upstream tag names to a named content bucket
//! and an "extreme" severity flag. Groups are kept in an ordered list: when a
//! tag belongs to several groups, the earliest group wins.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// A named content classification bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub name: String,
    pub tags: Vec<String>,
    pub extreme: bool,
}

impl FilterGroup {
    pub fn new(name: &str, tags: &[&str], extreme: bool) -> Self {
        Self {
            name: name.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            extreme,
        }
    }

    pub fn contains(&self, tag_name: &str) -> bool {
        self.tags.iter().any(|t| t == tag_name)
    }
}

/// Outcome of classifying one game's tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Sorted, deduplicated group names.
    pub filter_groups: Vec<String>,
    /// True if any credited group is extreme.
    pub extreme: bool,
}

/// Maps raw tag lists to filter groups using an ordered group table.
#[derive(Debug, Clone)]
pub struct TagClassifier {
    groups: Vec<FilterGroup>,
}

static BUILTIN: LazyLock<TagClassifier> =
    LazyLock::new(|| TagClassifier::new(builtin_filter_groups()));

impl TagClassifier {
    pub fn new(groups: Vec<FilterGroup>) -> Self {
        Self { groups }
    }

    /// Shared classifier over [`builtin_filter_groups`].
    pub fn builtin() -> &'static TagClassifier {
        &BUILTIN
    }

    /// Groups in priority order.
    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// Classify a game by its tag names.
    ///
    /// Each tag credits at most one group: the first in table order whose tag
    /// set contains it. Unmatched tags contribute nothing.
    pub fn classify<'a, I>(&self, tag_names: I) -> Classification
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut credited = BTreeSet::new();
        let mut extreme = false;

        for name in tag_names {
            if let Some(group) = self.groups.iter().find(|g| g.contains(name)) {
                credited.insert(group.name.as_str());
                extreme |= group.extreme;
            }
        }

        Classification {
            filter_groups: credited.into_iter().map(str::to_string).collect(),
            extreme,
        }
    }
}

impl Default for TagClassifier {
    fn default() -> Self {
        Self::new(builtin_filter_groups())
    }
}

// ── Built-in Table ──────────────────────────────────────────────────────────

const SEIZURE_WARNING_TAGS: &[&str] = &["Seizure Warning"];

const PORNOGRAPHY_TAGS: &[&str] = &[
    "Anal",
    "Anal Insertion",
    "BDSM",
    "Cartoon Porn",
    "Adult",
    "Anilingus",
    "Fingering",
    "Incest",
    "Oral",
    "Sexual Content",
    "Cunnilingus",
    "Fellatio",
    "Footjob",
    "Handjob",
    "Hypnosis",
    "Infantilism",
    "Inflation",
    "Interspecies",
    "Masturbation",
    "Paizuri",
    "Pregnancy",
    "Sex Toys",
    "Spanking",
    "Tentacles",
    "Touching",
    "Tribadism",
    "Urination",
    "Vaginal",
    "Vaginal Insertion",
    "Futanari",
    "Male Futanari",
    "Gynomorph",
    "Andromorph",
    "Oviposition",
    "Intersex",
    "Breast Milking",
    "Porn",
    "Hentai",
    "Group",
    "Solo",
    "Cannibalism",
    "Enema",
    "Frottage",
    "Kabeshiri",
    "Macrophilia",
    "Obesity",
    "Podophilia",
    "Quicksand",
    "Tickling",
    "Weight Gain",
    "Gloryhole",
    "Multiple Penises",
    "Ambiguous Penetration",
    "Self Oral",
];

const VIOLENCE_TAGS: &[&str] = &["Gore", "Strong Violence", "Strong Language"];

const BIGOTRY_TAGS: &[&str] = &["Homophobia", "Stereotyping", "Racism", "Transphobia"];

const PORNOGRAPHY_EXTREME_TAGS: &[&str] = &[
    "Bestiality",
    "Cannibalism",
    "Enema",
    "Fisting",
    "Flatulence",
    "Necrophilia",
    "Scat",
    "Vomit",
    "Vore",
    "Sexual Violence",
];

const MATURE_TOPICS_TAGS: &[&str] = &[
    "Drugs",
    "Reproductive Health",
    "Addiction",
    "Heavy Themes",
    "Suicide",
    "Nudity",
    "Moderate Language",
    "Sexual Harassment",
];

/// The site's filter group table, in priority order.
pub fn builtin_filter_groups() -> Vec<FilterGroup> {
    vec![
        FilterGroup::new("Seizure Warning", SEIZURE_WARNING_TAGS, false),
        FilterGroup::new("Pornography", PORNOGRAPHY_TAGS, true),
        FilterGroup::new("Violence", VIOLENCE_TAGS, true),
        FilterGroup::new("Bigotry", BIGOTRY_TAGS, true),
        FilterGroup::new("Pornography (Extreme)", PORNOGRAPHY_EXTREME_TAGS, true),
        FilterGroup::new("Otherwise Mature Topics", MATURE_TOPICS_TAGS, true),
    ]
}
