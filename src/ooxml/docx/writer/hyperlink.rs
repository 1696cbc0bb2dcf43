/// Hyperlink support for DOCX documents.
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

use super::run::MutableRun;

/// A mutable hyperlink in a document.
///
/// Groups one or more formatted runs under a single external target.
#[derive(Debug, Clone)]
pub struct MutableHyperlink {
    pub(crate) url: String,
    pub(crate) runs: Vec<MutableRun>,
}

impl MutableHyperlink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            runs: Vec::new(),
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Add a run carrying the `Hyperlink` character style.
    pub fn add_run(&mut self) -> &mut MutableRun {
        let mut run = MutableRun::new();
        run.style("Hyperlink");
        self.runs.push(run);
        let last = self.runs.len() - 1;
        &mut self.runs[last]
    }

    pub fn add_run_with_text(&mut self, text: &str) -> &mut MutableRun {
        let run = self.add_run();
        run.set_text(text);
        run
    }

    #[inline]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub(crate) fn to_xml(&self, xml: &mut String, r_id: &str) -> Result<()> {
        write!(xml, r#"<w:hyperlink r:id="{}">"#, r_id)?;
        for run in &self.runs {
            run.to_xml(xml)?;
        }
        xml.push_str("</w:hyperlink>");
        Ok(())
    }
}
