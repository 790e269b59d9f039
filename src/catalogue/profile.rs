use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogueKind {
    Projects,
    Posts,
    Coins,
    Waves,
}

impl CatalogueKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "projects" | "project" => Some(Self::Projects),
            "posts" | "post" | "latest" => Some(Self::Posts),
            "coins" | "coin" => Some(Self::Coins),
            "waves" | "wave" | "wave-analysis" => Some(Self::Waves),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Posts => "posts",
            Self::Coins => "coins",
            Self::Waves => "waves",
        }
    }
}

/// Text fields that participate in free-text search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchField {
    Name,
    Symbol,
    Description,
    Author,
    Coin,
    Market,
    Categories,
    Tags,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankField {
    MarketCap,
    Date,
    Priority,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankOrder {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Default,
    Alphabetical,
    Rank,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "default" | "none" => Some(Self::Default),
            "alphabetical" | "az" | "a-z" | "name" => Some(Self::Alphabetical),
            "rank" | "marketcap" | "market-cap" | "date" | "priority" => Some(Self::Rank),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Alphabetical => "alphabetical",
            Self::Rank => "rank",
        }
    }
}

/// Everything that differs between the listing pages: where the data lives,
/// which fields are searchable, how records rank and what a card links to.
#[derive(Clone, Debug)]
pub struct CatalogueProfile {
    pub kind: CatalogueKind,
    pub source: String,
    pub collection_key: Option<String>,
    pub search_fields: Vec<SearchField>,
    pub rank_field: RankField,
    pub rank_order: RankOrder,
    pub default_sort: SortKey,
    pub page_size: usize,
    pub visible_statuses: Vec<String>,
    pub placeholder_media: String,
    pub link_template: String,
    pub empty_message: String,
    pub failure_message: String,
}

impl CatalogueProfile {
    pub fn projects() -> Self {
        Self {
            kind: CatalogueKind::Projects,
            source: "../data/projects.json".to_string(),
            collection_key: None,
            search_fields: vec![
                SearchField::Name,
                SearchField::Symbol,
                SearchField::Description,
                SearchField::Tags,
            ],
            rank_field: RankField::MarketCap,
            rank_order: RankOrder::Descending,
            default_sort: SortKey::Default,
            page_size: 12,
            visible_statuses: vec!["published".to_string()],
            placeholder_media: "../assets/default-logo.png".to_string(),
            link_template: "./{slug}.html".to_string(),
            empty_message: "No projects match your search.".to_string(),
            failure_message: "Failed to load projects list.".to_string(),
        }
    }

    pub fn posts() -> Self {
        Self {
            kind: CatalogueKind::Posts,
            source: "./data/latest-index.json".to_string(),
            collection_key: Some("posts".to_string()),
            search_fields: vec![
                SearchField::Name,
                SearchField::Coin,
                SearchField::Author,
                SearchField::Description,
                SearchField::Categories,
                SearchField::Tags,
            ],
            rank_field: RankField::Date,
            rank_order: RankOrder::Descending,
            default_sort: SortKey::Default,
            page_size: 8,
            visible_statuses: Vec::new(),
            placeholder_media: String::new(),
            link_template: "#".to_string(),
            empty_message: "No analysis posts yet.".to_string(),
            failure_message: "Failed to load latest analysis.".to_string(),
        }
    }

    pub fn coins() -> Self {
        Self {
            kind: CatalogueKind::Coins,
            source: "./data/coins.json".to_string(),
            collection_key: None,
            search_fields: vec![
                SearchField::Name,
                SearchField::Symbol,
                SearchField::Market,
                SearchField::Description,
            ],
            rank_field: RankField::Priority,
            rank_order: RankOrder::Ascending,
            default_sort: SortKey::Rank,
            page_size: 12,
            visible_statuses: Vec::new(),
            placeholder_media: "../assets/default-logo.png".to_string(),
            link_template: "./coin.html?coin={id}".to_string(),
            empty_message: "No coin analyses available.".to_string(),
            failure_message: "Failed to load analysis.".to_string(),
        }
    }

    /// Wave-analysis write-ups: a bare array of posts, each linking to its own
    /// `url`.
    pub fn waves() -> Self {
        Self {
            kind: CatalogueKind::Waves,
            source: "../data/wave-analysis.json".to_string(),
            collection_key: None,
            search_fields: vec![
                SearchField::Name,
                SearchField::Author,
                SearchField::Description,
                SearchField::Categories,
            ],
            rank_field: RankField::Date,
            rank_order: RankOrder::Descending,
            default_sort: SortKey::Default,
            page_size: 12,
            visible_statuses: Vec::new(),
            placeholder_media: String::new(),
            link_template: "#".to_string(),
            empty_message: "No wave analysis posts yet.".to_string(),
            failure_message: "Failed to load wave analysis.".to_string(),
        }
    }

    pub fn for_kind(kind: CatalogueKind) -> Self {
        match kind {
            CatalogueKind::Projects => Self::projects(),
            CatalogueKind::Posts => Self::posts(),
            CatalogueKind::Coins => Self::coins(),
            CatalogueKind::Waves => Self::waves(),
        }
    }

    /// A record status passes when the gate is disabled, the record has no
    /// status, or the status is one of the visible ones.
    pub fn is_visible(&self, status: Option<&str>) -> bool {
        if self.visible_statuses.is_empty() {
            return true;
        }
        match status {
            None => true,
            Some(s) => self
                .visible_statuses
                .iter()
                .any(|v| v.eq_ignore_ascii_case(s.trim())),
        }
    }

    pub fn expand_link(&self, id: &str, slug: &str) -> String {
        self.link_template
            .replace("{slug}", slug)
            .replace("{id}", id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_gate_passes_missing_status() {
        let profile = CatalogueProfile::projects();
        assert!(profile.is_visible(None));
        assert!(profile.is_visible(Some("Published")));
        assert!(!profile.is_visible(Some("draft")));
    }

    #[test]
    fn empty_visible_list_disables_gate() {
        let profile = CatalogueProfile::posts();
        assert!(profile.is_visible(Some("invalidated")));
    }

    #[test]
    fn wave_names_select_the_wave_listing() {
        assert_eq!(CatalogueKind::parse("Waves"), Some(CatalogueKind::Waves));
        assert_eq!(CatalogueKind::parse("wave-analysis"), Some(CatalogueKind::Waves));
        assert_eq!(CatalogueKind::parse("coin"), Some(CatalogueKind::Coins));
        assert_eq!(CatalogueProfile::for_kind(CatalogueKind::Waves).collection_key, None);
    }

    #[test]
    fn link_template_expands_placeholders() {
        let profile = CatalogueProfile::coins();
        assert_eq!(profile.expand_link("btc", "bitcoin"), "./coin.html?coin=btc");
    }
}
