//! # Recipe Search
//!
//! The in-memory filter, sort and paginate pipeline behind the recipe
//! browser. Everything here is pure: it takes the full collection and a
//! [`RecipeQuery`] and returns a view.
//!
//! ## Pipeline
//!
//! Stages run in this order, each narrowing the previous result:
//!
//! 1. text search on title or any ingredient (case-insensitive substring)
//! 2. cooking-time range
//! 3. calories range
//! 4. difficulty (case-insensitive equality)
//! 5. minimum average rating
//! 6. stable sort
//! 7. pagination, [`ITEMS_PER_PAGE`] per page, pages numbered from 1
//!
//! ## Missing values
//!
//! A recipe without a cooking time or calorie count never matches an active
//! range filter, and sorts as 0. A recipe without a difficulty never matches
//! an active difficulty filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::client::types::{Difficulty, Recipe};

pub const ITEMS_PER_PAGE: usize = 12;

/// Cooking-time presets offered by the browser, in minutes.
pub const TIME_PRESETS: [&str; 4] = ["1-15", "15-30", "30-60", "60"];

/// Calorie presets offered by the browser, in kcal.
pub const CALORIE_PRESETS: [&str; 4] = ["1-300", "300-600", "600-1000", "1000"];

/// Inclusive numeric range, open-ended when `max` is `None`.
///
/// Parsed from `"min-max"` or `"min"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeFilter {
    pub min: u32,
    pub max: Option<u32>,
}

impl RangeFilter {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: u32) -> Self {
        Self { min, max: None }
    }

    /// Zero counts as missing, matching how unset numbers arrive from the
    /// backend.
    pub fn matches(&self, value: Option<u32>) -> bool {
        match value {
            Some(v) if v > 0 => v >= self.min && self.max.map_or(true, |max| v <= max),
            _ => false,
        }
    }
}

impl fmt::Display for RangeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}", self.min),
        }
    }
}

impl FromStr for RangeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid range '{}': expected \"min-max\" or \"min\"", s))
        };

        match s.split_once('-') {
            Some((min, max)) => {
                let (min, max) = (parse(min)?, parse(max)?);
                if max < min {
                    return Err(format!("invalid range '{}': max is below min", s));
                }
                Ok(Self::new(min, Some(max)))
            }
            None => Ok(Self::at_least(parse(s)?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOption {
    /// Average rating, highest first
    #[serde(rename = "rating")]
    Rating,
    /// Cooking time, shortest first
    #[serde(rename = "time-asc")]
    TimeAsc,
    /// Calories, lowest first
    #[serde(rename = "calories-asc")]
    CaloriesAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [SortOption::Rating, SortOption::TimeAsc, SortOption::CaloriesAsc];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Rating => "rating",
            SortOption::TimeAsc => "time-asc",
            SortOption::CaloriesAsc => "calories-asc",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rating" => Ok(SortOption::Rating),
            "time-asc" => Ok(SortOption::TimeAsc),
            "calories-asc" => Ok(SortOption::CaloriesAsc),
            other => Err(format!(
                "unknown sort option '{}': expected rating, time-asc or calories-asc",
                other
            )),
        }
    }
}

/// Every criterion the browser can apply. The default query matches
/// everything in original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeQuery {
    pub search: String,
    pub time: Option<RangeFilter>,
    pub calories: Option<RangeFilter>,
    pub difficulty: Option<Difficulty>,
    /// 0 disables the filter
    pub min_rating: u8,
    pub sort: Option<SortOption>,
}

impl RecipeQuery {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.time.is_none()
            && self.calories.is_none()
            && self.difficulty.is_none()
            && self.min_rating == 0
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        let query = self.search.trim().to_lowercase();
        if !query.is_empty() {
            let in_title = recipe.title.to_lowercase().contains(&query);
            let in_ingredients = recipe
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(&query));
            if !in_title && !in_ingredients {
                return false;
            }
        }

        if let Some(range) = &self.time {
            if !range.matches(recipe.cooking_time) {
                return false;
            }
        }

        if let Some(range) = &self.calories {
            if !range.matches(recipe.calories) {
                return false;
            }
        }

        if let Some(difficulty) = self.difficulty {
            if recipe.difficulty != Some(difficulty) {
                return false;
            }
        }

        if self.min_rating > 0 && recipe.average_rating < f64::from(self.min_rating) {
            return false;
        }

        true
    }

    /// Run the filter and sort stages. Pagination is separate so the caller
    /// can report the total match count.
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        let mut matched: Vec<&Recipe> = recipes.iter().filter(|r| self.matches(r)).collect();

        match self.sort {
            Some(SortOption::Rating) => {
                matched.sort_by(|a, b| b.average_rating.total_cmp(&a.average_rating))
            }
            Some(SortOption::TimeAsc) => matched.sort_by_key(|r| r.cooking_time.unwrap_or(0)),
            Some(SortOption::CaloriesAsc) => matched.sort_by_key(|r| r.calories.unwrap_or(0)),
            None => {}
        }

        matched
    }
}

pub fn total_pages(count: usize) -> usize {
    count.div_ceil(ITEMS_PER_PAGE)
}

/// The slice of `items` shown on 1-based `page`. Out-of-range pages are
/// empty.
pub fn paginate<T>(items: &[T], page: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(ITEMS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + ITEMS_PER_PAGE).min(items.len());
    &items[start..end]
}
