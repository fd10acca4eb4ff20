use std::fmt;

use chrono::{DateTime, Local};

/// A titled block of report text.
#[derive(Debug, Clone)]
pub struct ReportSection {
    pub title: String,
    lines: Vec<String>,
}

impl ReportSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    pub fn add_content(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Plain-text report made of sections, rendered through `Display`.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub subtitle: String,
    generated_at: DateTime<Local>,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            generated_at: Local::now(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.chars().count()))?;
        if !self.subtitle.is_empty() {
            writeln!(f, "{}", self.subtitle)?;
        }
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S"))?;
        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "{}", section.title)?;
            writeln!(f, "{}", "-".repeat(section.title.chars().count()))?;
            for line in &section.lines {
                writeln!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}
