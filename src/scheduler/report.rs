use std::io::{self, Stdout, Write};

use crate::error::Result;

/// One evaluation block in the final report
#[derive(Clone, Debug, PartialEq)]
pub struct ReportRow {
    pub games_played: usize,
    pub average_reward: f64,
}

/// Learning curve of a finished run
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub training_episodes: usize,
    pub rows: Vec<ReportRow>,
}

impl RunSummary {
    pub fn from_block_means(block_means: &[f64], interval: usize, training_episodes: usize) -> Self {
        let rows = block_means
            .iter()
            .enumerate()
            .map(|(i, mean)| ReportRow {
                games_played: interval * i,
                average_reward: *mean,
            })
            .collect();
        RunSummary {
            training_episodes,
            rows,
        }
    }
}

/// Receives the summary once the run concludes
pub trait ReportSink {
    fn report(&mut self, summary: &RunSummary) -> Result<()>;
}

const HEADER: &str = "Games Played      Average Cumulative Reward";
const RULE: &str = "-------------     -------------------------";
const FIRST_COLUMN: usize = 18;

/// Render the two-column learning-curve table
pub fn render_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    for row in &summary.rows {
        out.push_str(&format!(
            "{:<width$}{:.2}\n",
            row.games_played,
            row.average_reward,
            width = FIRST_COLUMN
        ));
    }
    out.push('\n');
    out
}

/// Writes the table to any writer (stdout by default)
pub struct TableReport<W: Write> {
    out: W,
}

impl TableReport<Stdout> {
    pub fn stdout() -> Self {
        TableReport { out: io::stdout() }
    }
}

impl<W: Write> TableReport<W> {
    pub fn new(out: W) -> Self {
        TableReport { out }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TableReport<W> {
    fn report(&mut self, summary: &RunSummary) -> Result<()> {
        self.out.write_all(render_table(summary).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
