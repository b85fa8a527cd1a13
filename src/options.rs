use std::str::FromStr;

/// How row 0 of a raw table becomes column labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderPolicy {
    /// Labels are taken exactly as extracted, duplicates and blanks included.
    #[default]
    Verbatim,
    /// Blank labels become `Unnamed: {index}`, repeats get `.1`, `.2`, ...
    Dedupe,
}

/// What the batch does when one PDF cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Skip,
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "abort" => Ok(Self::Abort),
            other => Err(format!("unknown failure policy '{other}', expected skip or abort")),
        }
    }
}

/// 1-based page numbers, kept as the inclusive ranges they were written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection {
    ranges: Vec<(u32, u32)>,
}

impl PageSelection {
    #[must_use]
    pub fn contains(&self, page: u32) -> bool {
        self.ranges
            .iter()
            .any(|&(start, end)| (start..=end).contains(&page))
    }
}

impl FromStr for PageSelection {
    type Err = String;

    fn from_str(selection: &str) -> Result<Self, Self::Err> {
        let mut ranges = Vec::new();
        for token in selection.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (start, end) = match token.split_once('-') {
                Some((start, end)) => (parse_page(start)?, parse_page(end)?),
                None => {
                    let page = parse_page(token)?;
                    (page, page)
                }
            };
            if end < start {
                return Err(format!("invalid range '{token}': end is smaller than start"));
            }
            ranges.push((start, end));
        }

        if ranges.is_empty() {
            return Err("page selection cannot be empty".to_string());
        }

        Ok(Self { ranges })
    }
}

fn parse_page(token: &str) -> Result<u32, String> {
    let token = token.trim();
    let page: u32 = token
        .parse()
        .map_err(|_| format!("invalid page number: '{token}'"))?;
    if page == 0 {
        return Err("pages are 1-based".to_string());
    }
    Ok(page)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    pub pages: Option<PageSelection>,
    /// Minimum cells a line needs to count as a table row.
    pub min_cols: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            pages: None,
            min_cols: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchOptions {
    pub extract: ExtractOptions,
    pub header_policy: HeaderPolicy,
    pub on_error: FailurePolicy,
}
