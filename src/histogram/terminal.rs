use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

use super::{Histogram, HistogramRenderer};

const TITLE: &str = "Rating distribution";

/// Horizontal bar chart written to any `Write`
pub struct TerminalRenderer<W: Write> {
    out: W,
    bar_width: usize,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(bar_width: usize) -> Self {
        Self::new(io::stdout(), bar_width)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, bar_width: usize) -> Self {
        Self { out, bar_width }
    }

    fn draw(&mut self, histogram: &Histogram) -> Result<()> {
        writeln!(self.out, "{}", TITLE.bold())?;

        let peak = histogram.max_count();
        let last = histogram.bins().len() - 1;
        for (idx, bin) in histogram.bins().iter().enumerate() {
            let closing = if idx == last { ']' } else { ')' };
            let bar = "█".repeat(bar_length(bin.count, peak, self.bar_width));
            writeln!(
                self.out,
                "[{:>6.2}, {:>6.2}{} {} {}",
                bin.lower,
                bin.upper,
                closing,
                bar.cyan(),
                bin.count
            )?;
        }

        writeln!(
            self.out,
            "{}",
            format!("Rating (n = {})", histogram.total()).dimmed()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> HistogramRenderer for TerminalRenderer<W> {
    fn render(&mut self, values: &[f64], bin_count: usize) -> Result<()> {
        let histogram = Histogram::from_values(values, bin_count)?;
        self.draw(&histogram)
    }
}

fn bar_length(count: usize, peak: usize, width: usize) -> usize {
    if peak == 0 {
        return 0;
    }
    ((count as f64 / peak as f64) * width as f64).round() as usize
}
