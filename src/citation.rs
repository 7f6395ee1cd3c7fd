use chrono::{Datelike, NaiveDate};

use crate::schema::strip_schema;

/// An archived copy of the cited page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedCopy {
    pub url: String,
    /// ISO 8601, e.g. `2019-01-01T00:00:00`.
    pub date: String,
}

/// Everything known about the page being cited.
///
/// `url`, `year` and `urldate` are always set; the rest are filled in as the lookups succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub url: String,
    pub urldate: String,
    pub year: String,
    /// Recorded for Wikipedia articles; the entry's author field is always left empty.
    pub author: Option<String>,
    /// Already escaped for BibTeX.
    pub title: Option<String>,
    pub snapshot: Option<ArchivedCopy>,
}

impl Citation {
    /// A fresh record for `url`, accessed on `today`.
    pub fn new(url: &str, today: NaiveDate) -> Self {
        Citation {
            url: url.to_string(),
            urldate: today.format("%Y-%m-%d").to_string(),
            year: today.year().to_string(),
            author: None,
            title: None,
            snapshot: None,
        }
    }

    /// Store a page title, protecting its commas from BibTeX.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.replace(',', "{,}"));
    }

    /// `example_com/page:2021:Online` for `https://example.com/page/` cited in 2021.
    pub fn key(&self) -> String {
        let stripped = strip_schema(&self.url).replace('.', "_");
        let stem = stripped.strip_suffix('/').unwrap_or(&stripped);
        format!("{}:{}:Online", stem, self.year)
    }

    /// The entry, one line per element, ready to paste into a `.bib` file.
    pub fn to_bibtex_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("@ONLINE{{{}", self.key()),
            "\tauthor = {},".to_string(),
        ];
        if let Some(title) = &self.title {
            lines.push(format!("\ttitle = {{{title}}},"));
        }
        lines.push("\tmonth = jun,".to_string());
        lines.push(format!("\tyear = {{{}}},", self.year));
        lines.push(format!("\turl = {{{}}},", self.url));
        lines.push(format!("\turldate = {{{}}}", self.urldate));
        if let Some(snap) = &self.snapshot {
            if let Some(last) = lines.last_mut() {
                last.push(',');
            }
            lines.push(format!(
                "\tnote = {{Internet Archive Wayback Machine: \\url{{{}}}, as of {}}}",
                snap.url, snap.date
            ));
        }
        lines.push("}".to_string());
        lines
    }
}
