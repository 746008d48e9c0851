pub const FILTER_PARAM: &str = "filter";
pub const MELT_PARAM: &str = "melt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Cast,
    Melt,
}

impl Orientation {
    pub fn is_melted(self) -> bool {
        matches!(self, Orientation::Melt)
    }

    pub fn as_flag(self) -> &'static str {
        match self {
            Orientation::Cast => "0",
            Orientation::Melt => "1",
        }
    }

    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "1" => Some(Orientation::Melt),
            "0" | "" => Some(Orientation::Cast),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Cast => "cast",
            Orientation::Melt => "melt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter_expression: String,
    pub orientation: Orientation,
    /// `None` asks the server for its default projection.
    pub visible_fields: Option<Vec<String>>,
}

impl ViewState {
    /// Pairs written to the shareable location. Visible fields never travel
    /// in the URL.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        vec![
            (FILTER_PARAM.to_string(), self.filter_expression.clone()),
            (
                MELT_PARAM.to_string(),
                self.orientation.as_flag().to_string(),
            ),
        ]
    }

    /// Rebuilds filter and orientation from location pairs. Missing or
    /// unreadable values fall back to the defaults; visible fields are kept.
    pub fn apply_query_pairs(&mut self, pairs: &[(String, String)]) {
        let mut filter = None;
        let mut orientation = None;
        for (key, value) in pairs {
            match key.as_str() {
                FILTER_PARAM => filter = Some(value.clone()),
                MELT_PARAM => orientation = Orientation::from_flag(value),
                _ => {}
            }
        }
        self.filter_expression = filter.unwrap_or_default();
        self.orientation = orientation.unwrap_or_default();
    }

    pub fn from_query_pairs(pairs: &[(String, String)]) -> Self {
        let mut state = ViewState::default();
        state.apply_query_pairs(pairs);
        state
    }
}
