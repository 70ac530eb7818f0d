use std::cmp::Ordering;

use serde::Serialize;

/// Number of cards shown when a result set first renders.
pub const PAGE_SIZE: usize = 12;

/// How many more cards each `show_more` reveals.
pub const SHOW_MORE_INCREMENT: usize = 12;

/// Closed set of shoe categories the service understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShoeType {
    Sport,
    Casual,
    Running,
    Boots,
}

/// Category every recommendation degrades to when nothing else resolves.
pub const FALLBACK_SHOE_TYPE: ShoeType = ShoeType::Casual;

impl ShoeType {
    pub const ALL: [ShoeType; 4] = [
        ShoeType::Sport,
        ShoeType::Casual,
        ShoeType::Running,
        ShoeType::Boots,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "sport" | "sports" => Some(Self::Sport),
            "casual" => Some(Self::Casual),
            "running" | "run" => Some(Self::Running),
            "boots" | "boot" => Some(Self::Boots),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sport => "sport",
            Self::Casual => "casual",
            Self::Running => "running",
            Self::Boots => "boots",
        }
    }
}

/// How a recommendation's category was obtained. Lookup means the
/// per-model endpoint answered; the other two are fallbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSource {
    Lookup,
    Heuristic,
    Default,
}

/// One server-produced suggestion, immutable once enriched.
#[derive(Clone, Debug, Serialize)]
pub struct Recommendation {
    pub model: String,
    pub compatibility: u8,
    pub best_size_eu: f32,
    pub shoe_type: ShoeType,
    pub type_source: TypeSource,
}

/// Compatibility threshold with an explicit no-filter sentinel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MinCompatibility {
    #[default]
    Any,
    AtLeast(u8),
}

impl MinCompatibility {
    fn admits(&self, compatibility: u8) -> bool {
        match self {
            Self::Any => true,
            Self::AtLeast(threshold) => compatibility >= *threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ShoeType),
}

impl TypeFilter {
    fn admits(&self, shoe_type: ShoeType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => shoe_type == *wanted,
        }
    }

    /// Parses a CLI/config value; "all" (or empty) passes everything.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        ShoeType::parse(trimmed).map(Self::Only)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    CompatibilityDesc,
    CompatibilityAsc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    pub const NAMES: [&'static str; 4] = ["compat-desc", "compat-asc", "name-asc", "name-desc"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "compat-desc" | "compatibility-desc" => Some(Self::CompatibilityDesc),
            "compat-asc" | "compatibility-asc" => Some(Self::CompatibilityAsc),
            "name-asc" | "name" => Some(Self::NameAsc),
            "name-desc" => Some(Self::NameDesc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CompatibilityDesc => "compat-desc",
            Self::CompatibilityAsc => "compat-asc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }
}

/// The active filter, sort, and pagination configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterConfig {
    pub min_compatibility: MinCompatibility,
    pub type_filter: TypeFilter,
    pub sort_key: SortKey,
    pub visible_count: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_compatibility: MinCompatibility::Any,
            type_filter: TypeFilter::All,
            sort_key: SortKey::CompatibilityDesc,
            visible_count: PAGE_SIZE,
        }
    }
}

/// A partial change to the filter configuration. Fields left as None
/// keep their current value when merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterUpdate {
    pub min_compatibility: Option<MinCompatibility>,
    pub type_filter: Option<TypeFilter>,
    pub sort_key: Option<SortKey>,
    pub visible_count: Option<usize>,
}

/// Outcome of loading the recommendation list. The three variants are
/// mutually exclusive; filtering only ever runs against Ready.
#[derive(Clone, Debug)]
pub enum CatalogState {
    /// The server answered with an error marker instead of a list.
    Unauthenticated,
    /// Authenticated, but the account has no recommendations yet.
    Empty,
    Ready(RecommendationView),
}

/// Owns the full enriched result set plus the filter configuration and
/// turns them into the visible window. The item list is never mutated
/// after construction, only filtered, sorted, and sliced.
#[derive(Clone, Debug)]
pub struct RecommendationView {
    items: Vec<Recommendation>,
    filters: FilterConfig,
}

impl RecommendationView {
    pub fn new(items: Vec<Recommendation>) -> Self {
        Self {
            items,
            filters: FilterConfig::default(),
        }
    }

    pub fn with_filters(items: Vec<Recommendation>, filters: FilterConfig) -> Self {
        Self { items, filters }
    }

    pub fn items(&self) -> &[Recommendation] {
        &self.items
    }

    pub fn filters(&self) -> &FilterConfig {
        &self.filters
    }

    /// Merges a partial update into the configuration. Untouched fields
    /// keep their values; in particular the visible window is not reset
    /// when a filter changes. A shrinking visible_count is clamped up so
    /// the window size stays non-decreasing for the view's lifetime.
    pub fn set_filter(&mut self, update: FilterUpdate) {
        if let Some(min) = update.min_compatibility {
            self.filters.min_compatibility = min;
        }
        if let Some(type_filter) = update.type_filter {
            self.filters.type_filter = type_filter;
        }
        if let Some(sort_key) = update.sort_key {
            self.filters.sort_key = sort_key;
        }
        if let Some(count) = update.visible_count {
            self.filters.visible_count = self.filters.visible_count.max(count);
        }
    }

    /// Widens the visible window by one page. Never refetches.
    pub fn show_more(&mut self) {
        self.filters.visible_count = self
            .filters
            .visible_count
            .saturating_add(SHOW_MORE_INCREMENT);
    }

    /// How many items survive the filters, before pagination.
    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    pub fn can_show_more(&self) -> bool {
        self.filtered_count() > self.filters.visible_count
    }

    fn filtered(&self) -> Vec<&Recommendation> {
        self.items
            .iter()
            .filter(|rec| self.filters.min_compatibility.admits(rec.compatibility))
            .filter(|rec| self.filters.type_filter.admits(rec.shoe_type))
            .collect()
    }

    /// The visible subset: filter, stable sort, then truncate to the
    /// window size. Deterministic over (items, filters); ties under the
    /// sort key keep their fetch order.
    pub fn visible(&self) -> Vec<&Recommendation> {
        let mut selected = self.filtered();
        match self.filters.sort_key {
            SortKey::CompatibilityDesc => {
                selected.sort_by(|a, b| b.compatibility.cmp(&a.compatibility))
            }
            SortKey::CompatibilityAsc => {
                selected.sort_by(|a, b| a.compatibility.cmp(&b.compatibility))
            }
            SortKey::NameAsc => selected.sort_by(|a, b| compare_models(&a.model, &b.model)),
            SortKey::NameDesc => {
                selected.sort_by(|a, b| compare_models(&b.model, &a.model))
            }
        }
        selected.truncate(self.filters.visible_count);
        selected
    }
}

// Case-insensitive model comparison with a raw tiebreak, so mixed-case
// catalogs order deterministically without pulling in a collation table.
fn compare_models(a: &str, b: &str) -> Ordering {
    let folded = a.to_lowercase().cmp(&b.to_lowercase());
    if folded == Ordering::Equal {
        a.cmp(b)
    } else {
        folded
    }
}

/// Color band for a compatibility percentage. The gallery paints High
/// green, Medium yellow, and Low red, matching the service's badges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompatibilityBand {
    High,
    Medium,
    Low,
}

pub fn compatibility_band(percentage: u8) -> CompatibilityBand {
    if percentage >= 80 {
        CompatibilityBand::High
    } else if percentage >= 60 {
        CompatibilityBand::Medium
    } else {
        CompatibilityBand::Low
    }
}
