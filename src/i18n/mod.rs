//! Internationalization (i18n) support

use serde::{Deserialize, Serialize};

/// Languages the site can be displayed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en", alias = "en-US")]
    En,
    #[serde(rename = "zh-CN", alias = "zh", alias = "zh-Hans")]
    ZhCn,
}

/// Coarse distance between a date and now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ago {
    Today,
    Yesterday,
    Days(i64),
    Weeks(i64),
    Months(i64),
    Years(i64),
}

impl Language {
    /// Phrase for a relative date
    pub fn ago(&self, ago: Ago) -> String {
        match self {
            Language::En => match ago {
                Ago::Today => "today".to_string(),
                Ago::Yesterday => "yesterday".to_string(),
                Ago::Days(n) => plural(n, "day"),
                Ago::Weeks(n) => plural(n, "week"),
                Ago::Months(n) => plural(n, "month"),
                Ago::Years(n) => plural(n, "year"),
            },
            Language::ZhCn => match ago {
                Ago::Today => "今天".to_string(),
                Ago::Yesterday => "昨天".to_string(),
                Ago::Days(n) => format!("{} 天前", n),
                Ago::Weeks(n) => format!("{} 周前", n),
                Ago::Months(n) => format!("{} 个月前", n),
                Ago::Years(n) => format!("{} 年前", n),
            },
        }
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
